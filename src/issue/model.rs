//! Issue record
//!
//! An issue is a single trackable work item. Every issue belongs to exactly
//! one project; the project is a plain string namespace, not a stored entity.

use super::IssueId;
use chrono::{DateTime, Utc};

/// Current time truncated to millisecond precision
///
/// Stored timestamps carry milliseconds, so values produced here compare
/// equal to what the store hands back.
pub fn timestamp_now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// A stored issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Storage-assigned identifier
    pub id: IssueId,

    /// Owning project (immutable)
    pub project: String,

    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,

    /// Assignee, empty when unassigned
    pub assigned_to: String,

    /// Free-form status line, empty by default
    pub status_text: String,

    /// Set once at creation
    pub created_on: DateTime<Utc>,

    /// Refreshed on every successful update
    pub updated_on: DateTime<Utc>,

    pub open: bool,
}

/// An issue that has not been stored yet
///
/// The store assigns the id on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub open: bool,
}

impl NewIssue {
    /// Create a new open issue with both timestamps set to now
    pub fn new(
        project: impl Into<String>,
        issue_title: impl Into<String>,
        issue_text: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        let now = timestamp_now();
        Self {
            project: project.into(),
            issue_title: issue_title.into(),
            issue_text: issue_text.into(),
            created_by: created_by.into(),
            assigned_to: String::new(),
            status_text: String::new(),
            created_on: now,
            updated_on: now,
            open: true,
        }
    }

    /// Set the assignee
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = assigned_to.into();
        self
    }

    /// Set the status text
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Attach the storage-assigned id
    pub fn into_issue(self, id: IssueId) -> Issue {
        Issue {
            id,
            project: self.project,
            issue_title: self.issue_title,
            issue_text: self.issue_text,
            created_by: self.created_by,
            assigned_to: self.assigned_to,
            status_text: self.status_text,
            created_on: self.created_on,
            updated_on: self.updated_on,
            open: self.open,
        }
    }
}
