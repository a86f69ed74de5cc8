//! Request validation
//!
//! Pure checks run before anything touches storage. Each returns either a
//! typed value or a [`ValidationError`] listing every offending field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::todo::{NewTodo, TodoId, TodoPatch};

pub const TITLE_MIN_CHARS: usize = 1;
pub const TITLE_MAX_CHARS: usize = 200;

/// One failed check, addressed by a dotted field path (`""` is the root value)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    #[serde(default)]
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(path, message)],
        }
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| {
            if i.path.is_empty() {
                i.message.clone()
            } else {
                format!("{}: {}", i.path, i.message)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accepts any non-empty identifier
pub fn validate_id(raw: &str) -> Result<TodoId, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::single("", too_short()));
    }
    Ok(raw.to_string())
}

/// Validates a create body: `{ "title": string }`, title trimmed to 1..=200 chars
pub fn validate_create(body: &Value) -> Result<NewTodo, ValidationError> {
    let object = expect_object(body)?;
    match object.get("title") {
        None => Err(ValidationError::single("title", "Required")),
        Some(value) => match check_title(value) {
            Ok(title) => Ok(NewTodo { title }),
            Err(message) => Err(ValidationError::single("title", message)),
        },
    }
}

/// Validates a partial update; at least one of `title` / `completed` must be present
pub fn validate_update(body: &Value) -> Result<TodoPatch, ValidationError> {
    let object = expect_object(body)?;
    let mut issues = Vec::new();
    let mut patch = TodoPatch::default();

    if let Some(value) = object.get("title") {
        match check_title(value) {
            Ok(title) => patch.title = Some(title),
            Err(message) => issues.push(FieldIssue::new("title", message)),
        }
    }

    if let Some(value) = object.get("completed") {
        match value {
            Value::Bool(completed) => patch.completed = Some(*completed),
            other => issues.push(FieldIssue::new(
                "completed",
                format!("Expected boolean, received {}", kind(other)),
            )),
        }
    }

    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }
    if patch.is_empty() {
        return Err(ValidationError::single(
            "",
            "At least one field must be provided",
        ));
    }
    Ok(patch)
}

fn expect_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or_else(|| {
        ValidationError::single("", format!("Expected object, received {}", kind(body)))
    })
}

fn check_title(value: &Value) -> Result<String, String> {
    let raw = value
        .as_str()
        .ok_or_else(|| format!("Expected string, received {}", kind(value)))?;
    let title = raw.trim();
    let len = title.chars().count();
    if len < TITLE_MIN_CHARS {
        return Err(too_short());
    }
    if len > TITLE_MAX_CHARS {
        return Err(format!(
            "String must contain at most {TITLE_MAX_CHARS} character(s)"
        ));
    }
    Ok(title.to_string())
}

fn too_short() -> String {
    format!("String must contain at least {TITLE_MIN_CHARS} character(s)")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(err: &ValidationError) -> Vec<&str> {
        err.issues.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("abc").unwrap(), "abc");
        let err = validate_id("").unwrap_err();
        assert_eq!(paths(&err), vec![""]);
    }

    #[test]
    fn test_create_trims_title() {
        let input = validate_create(&json!({ "title": "  Buy milk \n" })).unwrap();
        assert_eq!(input.title, "Buy milk");
    }

    #[test]
    fn test_create_ignores_unknown_fields() {
        let input = validate_create(&json!({ "title": "Buy milk", "completed": true })).unwrap();
        assert_eq!(input.title, "Buy milk");
    }

    #[test]
    fn test_create_rejects_blank_title() {
        for title in ["", "   ", "\t\n"] {
            let err = validate_create(&json!({ "title": title })).unwrap_err();
            assert_eq!(
                err.issues,
                vec![FieldIssue::new(
                    "title",
                    "String must contain at least 1 character(s)"
                )]
            );
        }
    }

    #[test]
    fn test_create_title_length_bounds() {
        let max = "a".repeat(TITLE_MAX_CHARS);
        assert_eq!(validate_create(&json!({ "title": max })).unwrap().title.len(), 200);

        // surrounding whitespace does not count towards the limit
        let padded = format!("  {}  ", "a".repeat(TITLE_MAX_CHARS));
        assert!(validate_create(&json!({ "title": padded })).is_ok());

        let too_long = "a".repeat(TITLE_MAX_CHARS + 1);
        let err = validate_create(&json!({ "title": too_long })).unwrap_err();
        assert_eq!(
            err.issues[0].message,
            "String must contain at most 200 character(s)"
        );
    }

    #[test]
    fn test_create_counts_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(validate_create(&json!({ "title": title })).is_ok());
    }

    #[test]
    fn test_create_requires_title() {
        let err = validate_create(&json!({})).unwrap_err();
        assert_eq!(err.issues, vec![FieldIssue::new("title", "Required")]);
    }

    #[test]
    fn test_create_rejects_non_string_title() {
        let err = validate_create(&json!({ "title": 42 })).unwrap_err();
        assert_eq!(err.issues[0].message, "Expected string, received number");
    }

    #[test]
    fn test_null_body_is_rejected() {
        let err = validate_create(&Value::Null).unwrap_err();
        assert_eq!(
            err.issues,
            vec![FieldIssue::new("", "Expected object, received null")]
        );
        assert!(validate_update(&Value::Null).is_err());
        assert!(validate_update(&json!([])).is_err());
    }

    #[test]
    fn test_update_partial_fields() {
        let patch = validate_update(&json!({ "completed": true })).unwrap();
        assert_eq!(patch, TodoPatch::completed(true));

        let patch = validate_update(&json!({ "title": " Renamed " })).unwrap();
        assert_eq!(patch, TodoPatch::title("Renamed"));

        let patch = validate_update(&json!({ "title": "Both", "completed": false })).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Both"));
        assert_eq!(patch.completed, Some(false));
    }

    #[test]
    fn test_update_rejects_empty_patch() {
        for body in [json!({}), json!({ "other": 1 })] {
            let err = validate_update(&body).unwrap_err();
            assert_eq!(
                err.issues,
                vec![FieldIssue::new("", "At least one field must be provided")]
            );
        }
    }

    #[test]
    fn test_update_collects_every_issue() {
        let err = validate_update(&json!({ "title": "", "completed": "yes" })).unwrap_err();
        assert_eq!(paths(&err), vec!["title", "completed"]);
        assert_eq!(err.issues[1].message, "Expected boolean, received string");
    }

    #[test]
    fn test_update_rejects_null_fields() {
        let err = validate_update(&json!({ "completed": null })).unwrap_err();
        assert_eq!(err.issues[0].message, "Expected boolean, received null");
    }

    #[test]
    fn test_display_joins_issues() {
        let err = validate_update(&json!({ "title": 1, "completed": 1 })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: title: Expected string, received number, completed: Expected boolean, received number"
        );
    }
}
