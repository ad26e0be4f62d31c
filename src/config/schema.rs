//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files;
//! every field has a default so a minimal (or absent) config works.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the task API server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Datastore backing file.
    pub storage: StorageConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// CSV import settings.
    pub import: ImportConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3333").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3333".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Datastore backing file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON file holding all tables.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("db.json"),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// CSV import configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Upper bound on concurrently submitted rows.
    pub max_in_flight: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { max_in_flight: 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3333");
        assert_eq!(config.storage.path, PathBuf::from("db.json"));
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.import.max_in_flight, 4);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "0.0.0.0:8080"

            [storage]
            path = "/var/lib/tasks/db.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/tasks/db.json"));
        // Untouched sections keep their defaults.
        assert_eq!(config.import.max_in_flight, 4);
    }
}
