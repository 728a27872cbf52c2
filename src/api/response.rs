//! Response payloads
//!
//! Every outcome, including domain errors, is sent with HTTP 200. Clients
//! tell success from failure by the presence of an `error` key.

use crate::issue::Issue;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::SecondsFormat;
use serde::Serialize;

pub const REQUIRED_FIELDS_MISSING: &str = "required field(s) missing";
pub const MISSING_ID: &str = "missing _id";
pub const NO_UPDATE_FIELDS: &str = "no update field(s) sent";
pub const COULD_NOT_UPDATE: &str = "could not update";
pub const COULD_NOT_DELETE: &str = "could not delete";
pub const COULD_NOT_CREATE: &str = "could not create";
pub const COULD_NOT_RETRIEVE: &str = "could not retrieve issues";
pub const SUCCESSFULLY_UPDATED: &str = "successfully updated";
pub const SUCCESSFULLY_DELETED: &str = "successfully deleted";

/// DTO for an issue, without its project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub created_on: String,
    pub updated_on: String,
    pub open: bool,
}

impl From<Issue> for IssueDto {
    fn from(issue: Issue) -> Self {
        Self {
            id: issue.id.as_string(),
            issue_title: issue.issue_title,
            issue_text: issue.issue_text,
            created_by: issue.created_by,
            assigned_to: issue.assigned_to,
            status_text: issue.status_text,
            created_on: issue.created_on.to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_on: issue.updated_on.to_rfc3339_opts(SecondsFormat::Millis, true),
            open: issue.open,
        }
    }
}

/// `{error, _id?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `{result, _id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeBody {
    pub result: &'static str,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Payload produced by one issue operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IssueResponse {
    Issues(Vec<IssueDto>),
    Issue(IssueDto),
    Outcome(OutcomeBody),
    Error(ErrorBody),
}

impl IssueResponse {
    /// Error without an id
    pub fn error(message: &'static str) -> Self {
        Self::Error(ErrorBody {
            error: message,
            id: None,
        })
    }

    /// Error echoing the client-supplied id
    pub fn error_for(message: &'static str, id: impl Into<String>) -> Self {
        Self::Error(ErrorBody {
            error: message,
            id: Some(id.into()),
        })
    }

    /// Success outcome echoing the id
    pub fn outcome(message: &'static str, id: impl Into<String>) -> Self {
        Self::Outcome(OutcomeBody {
            result: message,
            id: id.into(),
        })
    }
}

impl IntoResponse for IssueResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
