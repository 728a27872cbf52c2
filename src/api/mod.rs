//! Issue API
//!
//! HTTP surface for project-scoped issues.
//!
//! # Overview
//!
//! - [`IssueHandler`] - list/create/update/delete, independent of HTTP
//! - [`IssueServer`] - axum router, body extraction, request logging
//! - [`IssueResponse`] - payloads; domain errors are `{error, _id?}` with status 200

mod extract;
mod handler;
mod response;
mod server;

pub use extract::BodyFields;
pub use handler::IssueHandler;
pub use response::{
    ErrorBody, IssueDto, IssueResponse, OutcomeBody, COULD_NOT_CREATE, COULD_NOT_DELETE,
    COULD_NOT_RETRIEVE, COULD_NOT_UPDATE, MISSING_ID, NO_UPDATE_FIELDS, REQUIRED_FIELDS_MISSING,
    SUCCESSFULLY_DELETED, SUCCESSFULLY_UPDATED,
};
pub use server::{IssueServer, ServerError, DEFAULT_MAX_BODY_SIZE};
