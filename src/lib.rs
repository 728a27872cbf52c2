//! Issue Tracker - project-scoped issue tracking over HTTP
//!
//! Issues belong to a project named in the URL path. Clients list issues with
//! query-string filters, and create, update, or delete them with form or JSON
//! bodies. Every domain outcome is a JSON body with status 200.
//!
//! # Architecture
//!
//! - **issue**: Issue records and identifiers
//! - **filter**: Field registry, request-to-filter and request-to-update translation
//! - **storage**: Persistence behind the `IssueStore` trait (SQLite)
//! - **api**: Request handling, HTTP routing, response payloads
//! - **config**: Layered server configuration and validation
//! - **logging**: tracing subscriber setup

// Core modules
pub mod error;
pub mod filter;
pub mod issue;
pub mod storage;

// Service
pub mod api;
pub mod config;
pub mod logging;

// Re-exports
pub use error::{IssueTrackerError, Result};
