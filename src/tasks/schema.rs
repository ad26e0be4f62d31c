//! Input validation for task endpoints.
//!
//! # Responsibilities
//! - Check request bodies against the task-input shape
//! - Check path id parameters for UUID syntax
//!
//! # Design Decisions
//! - Returns all violations, not just the first
//! - Validation is a pure function over the raw JSON value; handlers
//!   decide the HTTP status

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Validated create/update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Validate a raw request body against the task-input shape.
pub fn validate_task_input(body: &Value) -> Result<TaskInput, Vec<Violation>> {
    let Some(object) = body.as_object() else {
        return Err(vec![Violation::new("body", "expected a JSON object")]);
    };

    let mut violations = Vec::new();
    let title = require_text(object, "title", &mut violations);
    let description = require_text(object, "description", &mut violations);

    match (title, description) {
        (Some(title), Some(description)) if violations.is_empty() => {
            Ok(TaskInput { title, description })
        }
        _ => Err(violations),
    }
}

fn require_text(
    object: &serde_json::Map<String, Value>,
    field: &str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match object.get(field) {
        None => {
            violations.push(Violation::new(field, "is required"));
            None
        }
        Some(Value::String(text)) if text.trim().is_empty() => {
            violations.push(Violation::new(field, "must not be empty"));
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            violations.push(Violation::new(field, "must be a string"));
            None
        }
    }
}

/// Check that a path id parameter is a syntactically valid UUID.
pub fn parse_id(raw: &str) -> Result<Uuid, Violation> {
    Uuid::parse_str(raw).map_err(|_| Violation::new("id", "must be a valid UUID"))
}
