//! Issue request handler
//!
//! One method per HTTP verb. Each call validates its input, builds a
//! predicate or update set with the filter builder, makes a few sequential
//! storage calls, and maps the outcome to an [`IssueResponse`]. Storage
//! failures are logged and mapped to the operation's error payload.

use super::response::{
    IssueDto, IssueResponse, COULD_NOT_CREATE, COULD_NOT_DELETE, COULD_NOT_RETRIEVE,
    COULD_NOT_UPDATE, MISSING_ID, NO_UPDATE_FIELDS, REQUIRED_FIELDS_MISSING,
    SUCCESSFULLY_DELETED, SUCCESSFULLY_UPDATED,
};
use crate::filter::{FieldParams, IssueField, IssueFilter, IssueUpdate};
use crate::issue::{timestamp_now, IssueId, NewIssue};
use crate::storage::IssueStore;
use std::sync::Arc;

/// Handles list/create/update/delete for the issues of a project
#[derive(Clone)]
pub struct IssueHandler {
    store: Arc<dyn IssueStore>,
}

impl IssueHandler {
    pub fn new(store: Arc<dyn IssueStore>) -> Self {
        Self { store }
    }

    /// List issues matching the query parameters
    pub async fn list(&self, project: &str, params: &FieldParams) -> IssueResponse {
        let filter = IssueFilter::from_params(project, params, timestamp_now());

        match self.store.find(&filter).await {
            Ok(issues) => {
                tracing::debug!(project, count = issues.len(), "Listed issues");
                IssueResponse::Issues(issues.into_iter().map(IssueDto::from).collect())
            }
            Err(e) => {
                tracing::warn!(project, error = %e, "Failed to list issues");
                IssueResponse::error(COULD_NOT_RETRIEVE)
            }
        }
    }

    /// Create an issue and return it as stored
    pub async fn create(&self, project: &str, params: &FieldParams) -> IssueResponse {
        let required = (
            params.non_empty(IssueField::IssueTitle.name()),
            params.non_empty(IssueField::IssueText.name()),
            params.non_empty(IssueField::CreatedBy.name()),
        );
        let (Some(issue_title), Some(issue_text), Some(created_by)) = required else {
            return IssueResponse::error(REQUIRED_FIELDS_MISSING);
        };

        let mut new_issue = NewIssue::new(project, issue_title, issue_text, created_by);
        if let Some(assigned_to) = params.non_empty(IssueField::AssignedTo.name()) {
            new_issue = new_issue.with_assigned_to(assigned_to);
        }
        if let Some(status_text) = params.non_empty(IssueField::StatusText.name()) {
            new_issue = new_issue.with_status_text(status_text);
        }

        let id = match self.store.insert(new_issue).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(project, error = %e, "Failed to insert issue");
                return IssueResponse::error(COULD_NOT_CREATE);
            }
        };

        // Read back so the response reflects what storage holds
        match self.store.find_one(&IssueFilter::for_issue(project, &id)).await {
            Ok(Some(issue)) => {
                tracing::info!(project, id = %id, "Created issue");
                IssueResponse::Issue(issue.into())
            }
            Ok(None) => {
                tracing::warn!(project, id = %id, "Created issue missing on read back");
                IssueResponse::error(COULD_NOT_CREATE)
            }
            Err(e) => {
                tracing::warn!(project, id = %id, error = %e, "Failed to read back issue");
                IssueResponse::error(COULD_NOT_CREATE)
            }
        }
    }

    /// Update fields of one issue in the project
    pub async fn update(&self, project: &str, params: &FieldParams) -> IssueResponse {
        let Some(raw_id) = params.non_empty(IssueField::Id.name()) else {
            return IssueResponse::error(MISSING_ID);
        };

        let update = IssueUpdate::from_params(params, timestamp_now());
        if update.is_empty() {
            return IssueResponse::error_for(NO_UPDATE_FIELDS, raw_id);
        }

        let id = match IssueId::parse(raw_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(project, error = %e, "Rejecting update");
                return IssueResponse::error_for(COULD_NOT_UPDATE, raw_id);
            }
        };

        let filter = IssueFilter::for_issue(project, &id);
        match self.store.find_one_and_update(&filter, &update).await {
            Ok(Some(_)) => {
                tracing::info!(
                    project,
                    id = %id,
                    changes = update.changes().len(),
                    "Updated issue"
                );
                IssueResponse::outcome(SUCCESSFULLY_UPDATED, raw_id)
            }
            Ok(None) => {
                tracing::debug!(project, id = %id, "No issue to update");
                IssueResponse::error_for(COULD_NOT_UPDATE, raw_id)
            }
            Err(e) => {
                tracing::warn!(project, id = %id, error = %e, "Failed to update issue");
                IssueResponse::error_for(COULD_NOT_UPDATE, raw_id)
            }
        }
    }

    /// Delete one issue in the project
    pub async fn delete(&self, project: &str, params: &FieldParams) -> IssueResponse {
        let Some(raw_id) = params.non_empty(IssueField::Id.name()) else {
            return IssueResponse::error(MISSING_ID);
        };

        let id = match IssueId::parse(raw_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(project, error = %e, "Rejecting delete");
                return IssueResponse::error_for(COULD_NOT_DELETE, raw_id);
            }
        };

        let filter = IssueFilter::for_issue(project, &id);
        match self.store.find_one(&filter).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!(project, id = %id, "No issue to delete");
                return IssueResponse::error_for(COULD_NOT_DELETE, raw_id);
            }
            Err(e) => {
                tracing::warn!(project, id = %id, error = %e, "Failed to look up issue");
                return IssueResponse::error_for(COULD_NOT_DELETE, raw_id);
            }
        }

        match self.store.delete_one(&filter).await {
            Ok(0) => {
                tracing::warn!(project, id = %id, "Delete matched nothing");
                IssueResponse::error_for(COULD_NOT_DELETE, raw_id)
            }
            Ok(_) => {
                tracing::info!(project, id = %id, "Deleted issue");
                IssueResponse::outcome(SUCCESSFULLY_DELETED, raw_id)
            }
            Err(e) => {
                tracing::warn!(project, id = %id, error = %e, "Failed to delete issue");
                IssueResponse::error_for(COULD_NOT_DELETE, raw_id)
            }
        }
    }
}
