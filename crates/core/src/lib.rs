//! Core library for the todo list service
//!
//! This crate contains the pieces shared by the server and the client:
//! - The todo model and its storage contract
//! - Request validation
//! - JSON response envelopes

pub mod envelope;
pub mod error;
pub mod todo;
pub mod validation;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
