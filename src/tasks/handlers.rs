//! The five task endpoints.
//!
//! # Responsibilities
//! - Register the task routes on a `RouteTable`
//! - Validate input, call the datastore, produce status-coded responses
//!
//! # Design Decisions
//! - Mutations answer with empty bodies; only the list endpoint
//!   serializes JSON
//! - Edits carry the existing `completed_at` and `created_at` forward so
//!   completion state survives a PUT
//! - Malformed-id status codes are intentionally inconsistent: PUT and
//!   DELETE answer 404, PATCH complete answers 400. The upstream service
//!   shipped with this split and clients may depend on it.

use std::collections::HashMap;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

use crate::routing::{RouteTable, TemplateError};
use crate::store::{Datastore, Record};
use crate::tasks::model::{now_timestamp, Task};
use crate::tasks::schema::{parse_id, validate_task_input};

/// Name of the single table this service owns.
pub const TASKS_TABLE: &str = "tasks";

/// Fields the free-text `search` parameter is applied to. Every field
/// must contain the term for a record to match.
const SEARCH_FIELDS: [&str; 5] = [
    "title",
    "description",
    "completed_at",
    "created_at",
    "updated_at",
];

/// Handler tag carried by the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRoute {
    List,
    Create,
    Update,
    Delete,
    Complete,
}

/// Build the route table. Declaration order matters: lookup is
/// first-registered-wins.
pub fn routes() -> Result<RouteTable<TaskRoute>, TemplateError> {
    RouteTable::new()
        .route(Method::GET, "/tasks", TaskRoute::List)?
        .route(Method::POST, "/tasks", TaskRoute::Create)?
        .route(Method::PUT, "/tasks/:id", TaskRoute::Update)?
        .route(Method::DELETE, "/tasks/:id", TaskRoute::Delete)?
        .route(Method::PATCH, "/tasks/:id/complete", TaskRoute::Complete)
}

/// GET /tasks: 200 with the (optionally filtered) task list.
pub async fn list_tasks(store: &Datastore, query: &HashMap<String, String>) -> Response {
    let search = query
        .get("search")
        .map(String::as_str)
        .filter(|term| !term.is_empty());

    let records = match search {
        Some(term) => {
            let filter: Vec<(&str, &str)> =
                SEARCH_FIELDS.iter().map(|field| (*field, term)).collect();
            store.select(TASKS_TABLE, Some(&filter)).await
        }
        None => store.select(TASKS_TABLE, None).await,
    };

    let tasks: Vec<Task> = records.iter().filter_map(Task::from_record).collect();
    Json(tasks).into_response()
}

/// POST /tasks: 201 on success, 400 on an invalid body.
pub async fn create_task(store: &Datastore, body: &Value) -> Response {
    let input = match validate_task_input(body) {
        Ok(input) => input,
        Err(violations) => {
            tracing::debug!(?violations, "create task rejected");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let task = Task::new(input.title, input.description);
    if let Err(err) = store.insert(TASKS_TABLE, task.to_record()).await {
        tracing::error!(error = %err, "failed to persist new task");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    StatusCode::CREATED.into_response()
}

/// PUT /tasks/:id: 204 on success, 404 for malformed/unknown id, 400 for
/// an invalid body.
pub async fn update_task(store: &Datastore, raw_id: &str, body: &Value) -> Response {
    if parse_id(raw_id).is_err() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let input = match validate_task_input(body) {
        Ok(input) => input,
        Err(violations) => {
            tracing::debug!(?violations, "update task rejected");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    let Some(existing) = store.select_first(TASKS_TABLE, &[("id", raw_id)]).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut fields = Record::new();
    fields.insert("title".into(), json!(input.title));
    fields.insert("description".into(), json!(input.description));
    // Completion state and creation time survive an edit.
    fields.insert("completed_at".into(), carried(&existing, "completed_at"));
    fields.insert("created_at".into(), carried(&existing, "created_at"));
    fields.insert("updated_at".into(), json!(now_timestamp()));

    persisted(store.update(TASKS_TABLE, raw_id, fields).await)
}

/// DELETE /tasks/:id: 204 on success, 404 for malformed/unknown id.
pub async fn delete_task(store: &Datastore, raw_id: &str) -> Response {
    if parse_id(raw_id).is_err() {
        return StatusCode::NOT_FOUND.into_response();
    }
    if store.select_first(TASKS_TABLE, &[("id", raw_id)]).await.is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    persisted(store.delete(TASKS_TABLE, raw_id).await)
}

/// PATCH /tasks/:id/complete: 204 on success, 400 for a malformed id
/// (unlike the other id handlers), 404 for an unknown one.
pub async fn complete_task(store: &Datastore, raw_id: &str) -> Response {
    if parse_id(raw_id).is_err() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let Some(existing) = store.select_first(TASKS_TABLE, &[("id", raw_id)]).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let now = now_timestamp();
    let mut fields = Record::new();
    fields.insert("title".into(), carried(&existing, "title"));
    fields.insert("description".into(), carried(&existing, "description"));
    fields.insert("completed_at".into(), json!(now));
    fields.insert("created_at".into(), carried(&existing, "created_at"));
    fields.insert("updated_at".into(), json!(now));

    persisted(store.update(TASKS_TABLE, raw_id, fields).await)
}

fn carried(record: &Record, field: &str) -> Value {
    record.get(field).cloned().unwrap_or_else(|| json!(""))
}

fn persisted(result: Result<(), crate::store::StoreError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to persist task mutation");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
