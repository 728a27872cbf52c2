//! Registry of known issue fields and their coercion rules

use chrono::{DateTime, Utc};
use std::fmt;

/// Every field an issue document carries
///
/// The registry is closed: request keys that do not name one of these
/// fields are never forwarded to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueField {
    Id,
    Project,
    IssueTitle,
    IssueText,
    CreatedBy,
    AssignedTo,
    StatusText,
    CreatedOn,
    UpdatedOn,
    Open,
}

/// How a request value is turned into a read predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    /// Exact match, ids compared in canonical form
    Exact,
    /// Case-insensitive substring match
    Contains,
    /// `"true"`/`"false"` only
    Flag,
    /// Value ignored, compared against the request instant
    RequestTime,
    /// Not filterable from request parameters
    Ignored,
}

/// How a request value is turned into a replacement value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRule {
    /// Literal replacement; empty values are dropped
    Text,
    /// `"true"`/`"false"` only
    Flag,
    /// Not client-settable
    Fixed,
}

/// A typed value bound for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Timestamp(DateTime<Utc>),
}

impl IssueField {
    /// All fields, in document order
    pub const ALL: [IssueField; 10] = [
        IssueField::Id,
        IssueField::Project,
        IssueField::IssueTitle,
        IssueField::IssueText,
        IssueField::CreatedBy,
        IssueField::AssignedTo,
        IssueField::StatusText,
        IssueField::CreatedOn,
        IssueField::UpdatedOn,
        IssueField::Open,
    ];

    /// Key used in requests and responses
    pub fn name(self) -> &'static str {
        match self {
            IssueField::Id => "_id",
            IssueField::Project => "project",
            IssueField::IssueTitle => "issue_title",
            IssueField::IssueText => "issue_text",
            IssueField::CreatedBy => "created_by",
            IssueField::AssignedTo => "assigned_to",
            IssueField::StatusText => "status_text",
            IssueField::CreatedOn => "created_on",
            IssueField::UpdatedOn => "updated_on",
            IssueField::Open => "open",
        }
    }

    /// Storage column holding the field
    pub fn column(self) -> &'static str {
        match self {
            IssueField::Id => "id",
            other => other.name(),
        }
    }

    /// Look up a field by its request key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn filter_rule(self) -> FilterRule {
        match self {
            IssueField::Id => FilterRule::Exact,
            IssueField::IssueTitle
            | IssueField::IssueText
            | IssueField::CreatedBy
            | IssueField::AssignedTo
            | IssueField::StatusText => FilterRule::Contains,
            IssueField::Open => FilterRule::Flag,
            IssueField::CreatedOn => FilterRule::RequestTime,
            // project always comes from the URL path
            IssueField::Project | IssueField::UpdatedOn => FilterRule::Ignored,
        }
    }

    pub fn update_rule(self) -> UpdateRule {
        match self {
            IssueField::IssueTitle
            | IssueField::IssueText
            | IssueField::CreatedBy
            | IssueField::AssignedTo
            | IssueField::StatusText => UpdateRule::Text,
            IssueField::Open => UpdateRule::Flag,
            IssueField::Id
            | IssueField::Project
            | IssueField::CreatedOn
            | IssueField::UpdatedOn => UpdateRule::Fixed,
        }
    }
}

impl fmt::Display for IssueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Coerce a request value to a boolean
///
/// Only the exact strings `"true"` and `"false"` are accepted.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
