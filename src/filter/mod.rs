//! Filter builder
//!
//! Translates request parameters into typed storage predicates and update
//! sets.
//!
//! # Overview
//!
//! Incoming query strings and form bodies are untyped string maps
//! ([`FieldParams`]). The builder walks the closed registry of known issue
//! fields ([`IssueField`]) and coerces each present value according to the
//! field's rule:
//!
//! - `open` - `"true"`/`"false"` become booleans, anything else is ignored
//! - `created_on` - when filtering, replaced by the request instant
//! - `_id` - when filtering, exact match
//! - text fields - case-insensitive substring match when filtering, literal
//!   replacement when updating (empty values are dropped)
//!
//! Keys outside the registry are dropped silently. Nothing in this module
//! fails: an update that ends up with no effective fields is reported through
//! [`IssueUpdate::is_empty`].

mod fields;
mod params;
mod query;
mod update;

pub use fields::{parse_flag, FieldValue, FilterRule, IssueField, UpdateRule};
pub use params::FieldParams;
pub use query::{Condition, IssueFilter};
pub use update::{FieldChange, IssueUpdate};
