//! Todo API endpoints
//!
//! RESTful API for todo CRUD operations. Bodies are read as raw bytes so that
//! malformed JSON is reported through the validation envelope instead of the
//! extractor's plain-text rejection.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value;

use todo_core::envelope::DataEnvelope;
use todo_core::todo::{ListOrder, Todo, TodoId};
use todo_core::validation::{validate_create, validate_id, validate_update, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// Unparsable or empty bodies become `null` and fail schema validation
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// Ids that cannot be decoded (e.g. invalid UTF-8) are reported like any other
/// invalid id
fn path_id(path: Result<Path<String>, PathRejection>) -> ApiResult<TodoId> {
    let Path(raw) = path.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected todo id");
        ValidationError::single("", rejection.body_text())
    })?;
    Ok(validate_id(&raw)?)
}

/// GET /api/todos - List all todos, newest first
async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<DataEnvelope<Vec<Todo>>>> {
    let todos = state.todo_store().list(ListOrder::NewestFirst).await?;
    Ok(Json(DataEnvelope::new(todos)))
}

/// POST /api/todos - Create a new todo
async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<DataEnvelope<Todo>>)> {
    let input = validate_create(&parse_body(&body))?;

    let created = state.todo_store().create(input).await?;
    tracing::info!(id = %created.id, "todo created");

    Ok((StatusCode::CREATED, Json(DataEnvelope::new(created))))
}

/// PATCH /api/todos/{id} - Update title and/or completion
async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> ApiResult<Json<DataEnvelope<Todo>>> {
    let id = path_id(id)?;
    let patch = validate_update(&parse_body(&body))?;

    let updated = state.todo_store().update(&id, patch).await?;
    tracing::info!(id = %updated.id, completed = updated.completed, "todo updated");

    Ok(Json(DataEnvelope::new(updated)))
}

/// DELETE /api/todos/{id} - Delete a todo
async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(id)?;

    state.todo_store().delete(&id).await?;
    tracing::info!(id = %id, "todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", patch(update_todo).delete(delete_todo))
}
