//! In-memory tables with write-through file persistence.
//!
//! # Responsibilities
//! - Hold named tables of records in insertion order
//! - Filtered reads: substring (fuzzy) select, exact-match select-first
//! - Mutations: insert, merge-update by id, delete by id
//! - Persist the full state after every mutating call
//!
//! # Design Decisions
//! - Records are untyped field maps; callers own the schema
//! - `select` filters by case-sensitive substring containment and every
//!   supplied filter field must match (AND); `select_first` uses exact
//!   equality instead
//! - `update` on an unknown id is a no-op; callers verify existence first
//! - `delete` persists whether or not a record was removed
//! - The mutex spans the in-memory mutation and the file write, so a
//!   reload never observes a torn state. Cross-process races remain
//!   last-write-wins.

use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::store::persist::{FileBackend, Record, StoreError, Tables};

/// File-backed table store.
#[derive(Debug)]
pub struct Datastore {
    backend: FileBackend,
    tables: Mutex<Tables>,
}

/// A read filter: field name paired with the value to search for.
pub type Filter<'a> = &'a [(&'a str, &'a str)];

impl Datastore {
    /// Open the datastore, loading any existing backing file.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let backend = FileBackend::new(path);
        let tables = backend.load().await?;
        Ok(Self {
            backend,
            tables: Mutex::new(tables),
        })
    }

    /// Select records from a table.
    ///
    /// With no filter, returns every record in insertion order. With a
    /// filter, returns records where each filter field's value contains
    /// the search value as a case-sensitive substring; all filter fields
    /// must match.
    pub async fn select(&self, table: &str, filter: Option<Filter<'_>>) -> Vec<Record> {
        let tables = self.tables.lock().await;
        let rows = match tables.get(table) {
            Some(rows) => rows,
            None => return Vec::new(),
        };
        match filter {
            None => rows.clone(),
            Some(filter) => rows
                .iter()
                .filter(|row| {
                    filter.iter().all(|(field, needle)| {
                        row.get(*field)
                            .and_then(|value| value.as_str())
                            .is_some_and(|value| value.contains(needle))
                    })
                })
                .cloned()
                .collect(),
        }
    }

    /// First record whose fields equal the filter values exactly, if any.
    pub async fn select_first(&self, table: &str, filter: Filter<'_>) -> Option<Record> {
        let tables = self.tables.lock().await;
        tables.get(table)?.iter().find_map(|row| {
            let matches = filter.iter().all(|(field, expected)| {
                row.get(*field)
                    .and_then(|value| value.as_str())
                    .is_some_and(|value| value == *expected)
            });
            matches.then(|| row.clone())
        })
    }

    /// Append a record and persist.
    pub async fn insert(&self, table: &str, record: Record) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.entry(table.to_string()).or_default().push(record);
        self.backend.save(&tables).await
    }

    /// Merge fields into the record with the given id and persist.
    ///
    /// Unknown ids are a no-op (nothing is written); callers are expected
    /// to have verified existence already.
    pub async fn update(&self, table: &str, id: &str, fields: Record) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(());
        };
        let Some(row) = rows.iter_mut().find(|row| field_equals(row, "id", id)) else {
            return Ok(());
        };
        for (field, value) in fields {
            row.insert(field, value);
        }
        self.backend.save(&tables).await
    }

    /// Remove the record with the given id, if present, and persist.
    pub async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !field_equals(row, "id", id));
        }
        self.backend.save(&tables).await
    }
}

fn field_equals(row: &Record, field: &str, expected: &str) -> bool {
    row.get(field)
        .and_then(|value| value.as_str())
        .is_some_and(|value| value == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("tasks-api-store-{}.json", uuid::Uuid::new_v4()))
    }

    fn record(id: &str, title: &str, description: &str) -> Record {
        let mut record = Record::new();
        record.insert("id".into(), json!(id));
        record.insert("title".into(), json!(title));
        record.insert("description".into(), json!(description));
        record
    }

    #[tokio::test]
    async fn test_substring_filter() {
        let store = Datastore::open(temp_path()).await.unwrap();
        store.insert("tasks", record("1", "Buy milk", "2L")).await.unwrap();
        store.insert("tasks", record("2", "Buy eggs", "a dozen")).await.unwrap();

        let rows = store.select("tasks", Some(&[("title", "milk")])).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&json!("1")));

        // Case-sensitive.
        let rows = store.select("tasks", Some(&[("title", "MILK")])).await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_filter_fields_are_anded() {
        let store = Datastore::open(temp_path()).await.unwrap();
        store.insert("tasks", record("1", "Buy milk", "2L")).await.unwrap();

        let rows = store
            .select("tasks", Some(&[("title", "milk"), ("description", "2L")]))
            .await;
        assert_eq!(rows.len(), 1);

        // One matching field is not enough.
        let rows = store
            .select("tasks", Some(&[("title", "milk"), ("description", "nope")]))
            .await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_select_first_is_exact() {
        let store = Datastore::open(temp_path()).await.unwrap();
        store.insert("tasks", record("abc-123", "Buy milk", "2L")).await.unwrap();

        // Substring of the id does not match.
        assert!(store.select_first("tasks", &[("id", "abc")]).await.is_none());

        let row = store.select_first("tasks", &[("id", "abc-123")]).await.unwrap();
        assert_eq!(row.get("title"), Some(&json!("Buy milk")));
    }

    #[tokio::test]
    async fn test_insert_select_round_trip_by_id() {
        let store = Datastore::open(temp_path()).await.unwrap();
        store.insert("tasks", record("42", "A", "B")).await.unwrap();
        store.insert("tasks", record("43", "C", "D")).await.unwrap();

        let row = store.select_first("tasks", &[("id", "42")]).await.unwrap();
        assert_eq!(row, record("42", "A", "B"));
    }

    #[tokio::test]
    async fn test_update_merges_and_ignores_unknown_id() {
        let store = Datastore::open(temp_path()).await.unwrap();
        store.insert("tasks", record("1", "A", "B")).await.unwrap();

        let mut fields = Record::new();
        fields.insert("title".into(), json!("A2"));
        store.update("tasks", "1", fields.clone()).await.unwrap();

        let row = store.select_first("tasks", &[("id", "1")]).await.unwrap();
        assert_eq!(row.get("title"), Some(&json!("A2")));
        assert_eq!(row.get("description"), Some(&json!("B")));

        // No-op on unknown id.
        store.update("tasks", "999", fields).await.unwrap();
        assert_eq!(store.select("tasks", None).await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_by_id() {
        let store = Datastore::open(temp_path()).await.unwrap();
        store.insert("tasks", record("1", "A", "B")).await.unwrap();

        store.delete("tasks", "1").await.unwrap();
        assert!(store.select("tasks", None).await.is_empty());

        // Deleting again is harmless.
        store.delete("tasks", "1").await.unwrap();
    }

    #[tokio::test]
    async fn test_reload_after_mutations() {
        let path = temp_path();
        {
            let store = Datastore::open(&path).await.unwrap();
            store.insert("tasks", record("1", "A", "B")).await.unwrap();
            store.insert("tasks", record("2", "C", "D")).await.unwrap();
            store.delete("tasks", "1").await.unwrap();
        }

        let store = Datastore::open(&path).await.unwrap();
        let rows = store.select("tasks", None).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&json!("2")));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
