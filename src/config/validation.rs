//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, parseable bind address)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    EmptyStoragePath,
    ZeroRequestTimeout,
    ZeroBodyLimit,
    ZeroImportConcurrency,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address {:?} is not a socket address", addr)
            }
            ValidationError::EmptyStoragePath => write!(f, "storage.path must not be empty"),
            ValidationError::ZeroRequestTimeout => {
                write!(f, "timeouts.request_secs must be greater than zero")
            }
            ValidationError::ZeroBodyLimit => {
                write!(f, "listener.max_body_bytes must be greater than zero")
            }
            ValidationError::ZeroImportConcurrency => {
                write!(f, "import.max_in_flight must be greater than zero")
            }
        }
    }
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.storage.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyStoragePath);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.import.max_in_flight == 0 {
        errors.push(ValidationError::ZeroImportConcurrency);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.import.max_in_flight = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::ZeroImportConcurrency));
    }
}
