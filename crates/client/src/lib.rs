//! Client side of the todo list
//!
//! - [`gateway`]: typed wrapper around the HTTP API
//! - [`controller`]: list state machine driven by commands
//! - [`view`]: plain-text rendering of the controller state
//! - [`input`]: parsing of terminal commands

pub mod controller;
pub mod error;
pub mod gateway;
pub mod input;
pub mod view;

pub use controller::{Command, Effect, Outcome, TodoController, TodoState};
pub use error::{ClientError, Result};
pub use gateway::{HttpTodoClient, TodoGateway};
