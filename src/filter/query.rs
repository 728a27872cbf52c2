//! Read predicates

use super::fields::{parse_flag, FieldValue, FilterRule, IssueField};
use super::params::FieldParams;
use crate::issue::IssueId;
use chrono::{DateTime, Utc};

/// A single predicate term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Field equals the value
    Equals { field: IssueField, value: FieldValue },
    /// Field contains the needle, ignoring case
    Contains { field: IssueField, needle: String },
}

/// Predicate over the issues of one project
///
/// The project is always an exact match; conditions are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFilter {
    project: String,
    conditions: Vec<Condition>,
}

impl IssueFilter {
    /// Match every issue in a project
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            conditions: Vec::new(),
        }
    }

    /// Match one issue by id, scoped to its project
    pub fn for_issue(project: impl Into<String>, id: &IssueId) -> Self {
        Self::for_project(project).with_condition(Condition::Equals {
            field: IssueField::Id,
            value: FieldValue::Text(id.as_string()),
        })
    }

    /// Build a predicate from list query parameters
    ///
    /// `now` is the request instant substituted for `created_on`.
    pub fn from_params(
        project: impl Into<String>,
        params: &FieldParams,
        now: DateTime<Utc>,
    ) -> Self {
        let mut filter = Self::for_project(project);

        for field in IssueField::ALL {
            let Some(value) = params.get(field.name()) else {
                continue;
            };

            let condition = match field.filter_rule() {
                FilterRule::Exact => Some(Condition::Equals {
                    field,
                    value: FieldValue::Text(exact_text(field, value)),
                }),
                FilterRule::Contains => Some(Condition::Contains {
                    field,
                    needle: value.to_string(),
                }),
                FilterRule::Flag => parse_flag(value).map(|flag| Condition::Equals {
                    field,
                    value: FieldValue::Flag(flag),
                }),
                FilterRule::RequestTime => Some(Condition::Equals {
                    field,
                    value: FieldValue::Timestamp(now),
                }),
                FilterRule::Ignored => None,
            };

            match condition {
                Some(condition) => filter.conditions.push(condition),
                None => tracing::debug!(field = field.name(), value, "Ignoring filter value"),
            }
        }

        for key in params.keys().filter(|k| IssueField::from_name(k).is_none()) {
            tracing::debug!(key, "Ignoring unknown filter field");
        }

        filter
    }

    /// Add a condition
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// Ids compare in canonical form; a malformed id is kept as-is and matches nothing
fn exact_text(field: IssueField, value: &str) -> String {
    match field {
        IssueField::Id => IssueId::parse(value)
            .map(|id| id.as_string())
            .unwrap_or_else(|_| value.to_string()),
        _ => value.to_string(),
    }
}
