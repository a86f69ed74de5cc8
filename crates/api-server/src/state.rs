//! Application state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use todo_core::todo::{FileTodoStore, TodoRepository};

pub const TODOS_FILE: &str = "todos.json";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    data_dir: PathBuf,
    todo_store: Arc<dyn TodoRepository>,
}

impl AppState {
    /// Create a new AppState backed by [`TODOS_FILE`] in the given data directory
    pub async fn new(data_dir: PathBuf) -> todo_core::Result<Self> {
        let todo_store = FileTodoStore::new(data_dir.join(TODOS_FILE)).await?;
        Ok(Self::with_store(data_dir, Arc::new(todo_store)))
    }

    /// Create an AppState over an existing store
    pub fn with_store(data_dir: PathBuf, todo_store: Arc<dyn TodoRepository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                data_dir,
                todo_store,
            }),
        }
    }

    /// Get reference to the todo store
    pub fn todo_store(&self) -> &dyn TodoRepository {
        self.inner.todo_store.as_ref()
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }
}
