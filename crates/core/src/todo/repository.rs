//! Todo repository trait
//!
//! Defines the interface for todo storage operations.

use async_trait::async_trait;

use super::model::{NewTodo, Todo, TodoPatch};
use crate::Result;

/// Ordering of `list` results by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Repository interface for todo CRUD operations
///
/// Implementations own id generation and timestamps. Updating or deleting an
/// id with no stored record fails with [`crate::Error::TodoNotFound`].
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Get all todos
    async fn list(&self, order: ListOrder) -> Result<Vec<Todo>>;

    /// Create a new todo
    async fn create(&self, input: NewTodo) -> Result<Todo>;

    /// Apply a patch to an existing todo
    async fn update(&self, id: &str, patch: TodoPatch) -> Result<Todo>;

    /// Delete a todo by ID
    async fn delete(&self, id: &str) -> Result<()>;
}
