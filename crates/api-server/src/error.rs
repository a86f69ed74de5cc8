//! API error type and its mapping onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use todo_core::envelope::{ErrorEnvelope, INTERNAL_ERROR};
use todo_core::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Todo {0} not found")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(todo_core::Error),
}

impl From<todo_core::Error> for ApiError {
    fn from(err: todo_core::Error) -> Self {
        match err {
            todo_core::Error::TodoNotFound(id) => Self::NotFound(id),
            other => Self::Internal(other),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Validation(err) => {
                tracing::debug!(error = %err, "rejected request");
                ErrorEnvelope::from(err)
            }
            Self::NotFound(id) => {
                tracing::debug!(id = %id, "todo not found");
                ErrorEnvelope::not_found()
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "storage failure");
                ErrorEnvelope::new(INTERNAL_ERROR)
            }
        };
        (status, Json(body)).into_response()
    }
}
