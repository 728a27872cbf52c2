//! Issue data model
//!
//! Defines the Issue record, its identifier, and the shape of a new issue
//! before storage assigns it an id.

mod ids;
mod model;

pub use ids::{IdError, IssueId};
pub use model::{timestamp_now, Issue, NewIssue};
