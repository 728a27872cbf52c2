//! Update sets

use super::fields::{parse_flag, FieldValue, IssueField, UpdateRule};
use super::params::FieldParams;
use chrono::{DateTime, Utc};

/// One field replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: IssueField,
    pub value: FieldValue,
}

/// Fields to replace on an issue, plus the forced `updated_on` refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueUpdate {
    changes: Vec<FieldChange>,
    updated_on: DateTime<Utc>,
}

impl IssueUpdate {
    /// An update that only refreshes `updated_on`
    pub fn new(updated_on: DateTime<Utc>) -> Self {
        Self {
            changes: Vec::new(),
            updated_on,
        }
    }

    /// Build an update set from request body parameters
    ///
    /// Empty text values are dropped. `open` is kept only for `"true"` or
    /// `"false"`. Fields that are not client-settable are ignored.
    pub fn from_params(params: &FieldParams, now: DateTime<Utc>) -> Self {
        let mut update = Self::new(now);

        for field in IssueField::ALL {
            let Some(value) = params.get(field.name()) else {
                continue;
            };

            let value = match field.update_rule() {
                UpdateRule::Text if !value.is_empty() => Some(FieldValue::Text(value.to_string())),
                UpdateRule::Text => None,
                UpdateRule::Flag => parse_flag(value).map(FieldValue::Flag),
                UpdateRule::Fixed => None,
            };

            if let Some(value) = value {
                update.changes.push(FieldChange { field, value });
            }
        }

        update
    }

    /// Add a change
    pub fn with_change(mut self, field: IssueField, value: FieldValue) -> Self {
        self.changes.push(FieldChange { field, value });
        self
    }

    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    pub fn updated_on(&self) -> DateTime<Utc> {
        self.updated_on
    }

    /// True when no field besides `updated_on` would change
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
