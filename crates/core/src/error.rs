//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Todo not found: {0}")]
    TodoNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the error means the targeted record has no storage row
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TodoNotFound(_))
    }
}
