//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ServerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(content: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("tasks-api-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let path = temp_file("[timeouts]\nrequest_secs = 5\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.timeouts.request_secs, 5);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = temp_file("[import]\nmax_in_flight = 0\n");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/tasks-api.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
