//! Server configuration read from the environment

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::state::TODOS_FILE;

pub const DATA_DIR_VAR: &str = "TODO_DATA_DIR";
pub const BIND_ADDR_VAR: &str = "TODO_BIND_ADDR";

const DEFAULT_DATA_DIR: &str = ".todo-data";
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8081);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the todo file
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir.trim());
        }

        if let Some(raw) = lookup(BIND_ADDR_VAR) {
            match raw.trim().parse::<SocketAddr>() {
                Ok(addr) => config.bind_addr = addr,
                Err(err) => tracing::warn!(
                    value = %raw,
                    error = %err,
                    "ignoring invalid {BIND_ADDR_VAR}, using {}",
                    config.bind_addr
                ),
            }
        }

        config
    }

    pub fn todos_path(&self) -> PathBuf {
        self.data_dir.join(TODOS_FILE)
    }
}
