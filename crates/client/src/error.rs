//! Error type for the HTTP gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Every failure a gateway call can produce; `Display` is the user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Server answered with a non-success status
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// Success status but the body was not the expected envelope
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Error code from the server envelope, if one was parsed
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
