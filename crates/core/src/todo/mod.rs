//! Todo module
//!
//! This module contains the todo model and its storage.

mod file_store;
mod model;
mod repository;

pub use file_store::FileTodoStore;
pub use model::*;
pub use repository::{ListOrder, TodoRepository};
