//! Error types for the issue tracker
//!
//! Subsystems define their own error enums (`StoreError`, `ServerError`,
//! `IdError`); this module folds them into one crate-level type for the
//! binary and configuration code. Uses thiserror for ergonomic error handling.

use crate::api::ServerError;
use crate::issue::IdError;
use crate::storage::StoreError;
use thiserror::Error;

/// Result type alias for issue tracker operations
pub type Result<T> = std::result::Result<T, IssueTrackerError>;

/// Crate-level error type
#[derive(Error, Debug)]
pub enum IssueTrackerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Storage gateway errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Malformed issue identifier
    #[error("Invalid issue id: {0}")]
    InvalidIssueId(#[from] IdError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
