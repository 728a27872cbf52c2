//! Storage gateway
//!
//! Wraps the `issues` collection behind the [`IssueStore`] trait. Handlers
//! receive an `Arc<dyn IssueStore>` and never open connections themselves.
//!
//! # Connection strings
//!
//! - `sqlite::memory:` or `:memory:` - private in-memory database
//! - `sqlite://path/to/issues.db` or `sqlite:path/to/issues.db` - file database
//! - `path/to/issues.db` - file database

mod sqlite;

pub use sqlite::{SqliteIssueStore, StorageLocation};

use crate::filter::{IssueFilter, IssueUpdate};
use crate::issue::{Issue, IssueId, NewIssue};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Document store holding issues
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// All issues matching the filter, in insertion order
    async fn find(&self, filter: &IssueFilter) -> Result<Vec<Issue>>;

    /// First issue matching the filter
    async fn find_one(&self, filter: &IssueFilter) -> Result<Option<Issue>> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    /// Store a new issue and return its assigned id
    async fn insert(&self, issue: NewIssue) -> Result<IssueId>;

    /// Apply an update to the first matching issue
    ///
    /// Returns the issue as it reads after the update, or `None` when
    /// nothing matched.
    async fn find_one_and_update(
        &self,
        filter: &IssueFilter,
        update: &IssueUpdate,
    ) -> Result<Option<Issue>>;

    /// Delete the first matching issue and return the number deleted
    async fn delete_one(&self, filter: &IssueFilter) -> Result<u64>;
}

/// Open the store named by a connection string
///
/// Called once at startup; any error here should abort the process.
pub fn connect(connection_string: &str) -> Result<Arc<dyn IssueStore>> {
    let location = StorageLocation::parse(connection_string)?;
    let store = SqliteIssueStore::open(location)?;
    Ok(Arc::new(store))
}
