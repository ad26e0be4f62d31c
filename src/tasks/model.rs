//! The task record.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

/// A to-do item as stored and served.
///
/// Timestamps are RFC-3339 strings; `completed_at` is the empty string
/// while the task is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// Create a fresh task: new id, `created_at == updated_at`, not
    /// completed.
    pub fn new(title: String, description: String) -> Self {
        let now = now_timestamp();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            completed_at: String::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Serialize into a datastore record.
    pub fn to_record(&self) -> Record {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // A plain struct of strings cannot fail to serialize.
            _ => Record::new(),
        }
    }

    /// Deserialize from a datastore record, `None` if the record does not
    /// have the task shape.
    pub fn from_record(record: &Record) -> Option<Self> {
        serde_json::from_value(serde_json::Value::Object(record.clone())).ok()
    }
}

/// Current time as an RFC-3339 UTC string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
