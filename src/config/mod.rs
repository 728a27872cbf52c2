//! Configuration system
//!
//! Server settings are layered, later sources winning:
//! - built-in defaults
//! - an optional YAML file (~/.config/issue-tracker/config.yaml by default)
//! - environment variables (`DATABASE_URL`, `HOST`, `PORT`, ...)
//! - command-line flags

mod server_config;
pub mod validation;

pub use server_config::{
    LogFormat, ServerConfig, ENV_DATABASE_URL, ENV_HOST, ENV_LOG_FORMAT, ENV_MAX_BODY_SIZE,
    ENV_PORT, ENV_TEST_ISSUE_ID,
};
pub use validation::{validate_config, validate_config_result, ValidationError};
