//! Backing-file persistence for the datastore.
//!
//! # Responsibilities
//! - Load the full table map from disk at startup
//! - Write the full table map back after every mutation
//!
//! # Design Decisions
//! - Whole-file JSON writes; last successful write wins. No atomicity
//!   beyond that; concurrent-writer consistency is out of scope.
//! - A missing file is an empty datastore, not an error

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A single stored record: a field-name to value mapping.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// All tables, keyed by table name.
pub type Tables = HashMap<String, Vec<Record>>;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("datastore io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("datastore file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// JSON file backend with a load-at-startup / save-on-mutation contract.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table map from disk. Missing file yields empty tables.
    pub async fn load(&self) -> Result<Tables, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Tables::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Serialize and write the full table map.
    pub async fn save(&self, tables: &Tables) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(tables)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("tasks-api-persist-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let backend = FileBackend::new(temp_path());
        let tables = backend.load().await.unwrap();
        assert!(tables.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let path = temp_path();
        let backend = FileBackend::new(&path);

        let mut record = Record::new();
        record.insert("id".into(), json!("1"));
        record.insert("title".into(), json!("Buy milk"));

        let mut tables = Tables::new();
        tables.insert("tasks".into(), vec![record]);

        backend.save(&tables).await.unwrap();
        let reloaded = FileBackend::new(&path).load().await.unwrap();
        assert_eq!(reloaded, tables);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
