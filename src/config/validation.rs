//! Configuration validation
//!
//! Validates server configuration for correctness:
//! - The storage connection string is one the store understands
//! - Host, port and body limit are usable
//! - A configured test issue id is well formed

use super::server_config::ServerConfig;
use crate::issue::IssueId;
use crate::storage::StorageLocation;
use crate::IssueTrackerError;

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a server configuration
pub fn validate_config(config: &ServerConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.database_url.trim().is_empty() {
        errors.push(ValidationError::new(
            "database_url",
            "Connection string cannot be empty",
        ));
    } else if StorageLocation::parse(&config.database_url).is_err() {
        errors.push(ValidationError::new(
            "database_url",
            format!(
                "Unsupported connection string '{}'. Use sqlite::memory:, sqlite://<path> or a file path",
                config.database_url
            ),
        ));
    }

    if config.host.trim().is_empty() {
        errors.push(ValidationError::new("host", "Host cannot be empty"));
    }

    if config.port == 0 {
        errors.push(ValidationError::new("port", "Port must be greater than 0"));
    }

    if config.max_body_size == 0 {
        errors.push(ValidationError::new(
            "max_body_size",
            "Body size limit must be greater than 0",
        ));
    }

    if let Some(ref id) = config.test_issue_id {
        if IssueId::parse(id).is_err() {
            errors.push(ValidationError::new(
                "test_issue_id",
                format!("Not a valid issue id: {}", id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate configuration and return a Result
pub fn validate_config_result(config: &ServerConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        IssueTrackerError::Config(format!(
            "Configuration validation failed:\n  - {}",
            messages.join("\n  - ")
        ))
    })
}
