//! JSON response envelopes
//!
//! Every response body is either `{ "data": ... }` or `{ "error": ... }`.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldIssue, ValidationError};

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Successful payload wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Error payload wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn not_found() -> Self {
        Self::new(NOT_FOUND)
    }

    pub fn is_validation(&self) -> bool {
        self.error == VALIDATION_ERROR
    }
}

impl From<ValidationError> for ErrorEnvelope {
    fn from(err: ValidationError) -> Self {
        Self {
            error: VALIDATION_ERROR.to_string(),
            details: Some(err.issues),
        }
    }
}
