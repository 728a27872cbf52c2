//! Server configuration handling

use crate::api::DEFAULT_MAX_BODY_SIZE;
use crate::{IssueTrackerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_MAX_BODY_SIZE: &str = "MAX_BODY_SIZE";
/// Known existing issue id used by functional test runs
pub const ENV_TEST_ISSUE_ID: &str = "TEST_ISSUE_ID";

/// Log output style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line, human readable
    #[default]
    Pretty,
    /// One line per event
    Compact,
}

impl FromStr for LogFormat {
    type Err = IssueTrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(IssueTrackerError::Config(format!(
                "Invalid log format '{}'. Must be one of: pretty, compact",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Issue server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Storage connection string
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request body limit in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Known existing issue id, set only for functional test runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_issue_id: Option<String>,
}

fn default_database_url() -> String {
    // Always use ~/.config for consistency across platforms (macOS, Linux)
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("issue-tracker");
    path.push("issues.db");
    format!("sqlite://{}", path.display())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            host: default_host(),
            port: default_port(),
            max_body_size: default_max_body_size(),
            log_format: LogFormat::default(),
            test_issue_id: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(IssueTrackerError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading server configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(port = config.port, host = %config.host, "Configuration loaded");

        Ok(config)
    }

    /// Load from an explicit path, else the default path if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default config path (~/.config/issue-tracker/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("issue-tracker");
        path.push("config.yaml");
        path
    }

    /// Override settings from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override settings from an environment lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = url;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| {
                IssueTrackerError::Config(format!("{} is not a valid port: {}", ENV_PORT, port))
            })?;
        }
        if let Some(size) = lookup(ENV_MAX_BODY_SIZE) {
            self.max_body_size = size.trim().parse().map_err(|_| {
                IssueTrackerError::Config(format!(
                    "{} is not a valid byte count: {}",
                    ENV_MAX_BODY_SIZE, size
                ))
            })?;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.log_format = format.parse()?;
        }
        if let Some(id) = lookup(ENV_TEST_ISSUE_ID).filter(|id| !id.is_empty()) {
            self.test_issue_id = Some(id);
        }

        Ok(())
    }

    /// Address to bind, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
