//! Logging configuration using tracing
//!
//! Provides structured logging to stderr with support for the RUST_LOG environment variable.

use crate::config::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Sets up structured logging with:
/// - Filtering via RUST_LOG environment variable (defaults to "info" so the
///   listen address and per-request lines are visible)
/// - Pretty or compact formatted output to stderr
///
/// # Example RUST_LOG values
/// - `RUST_LOG=debug` - Show debug and above
/// - `RUST_LOG=issue_tracker=trace` - Trace level for this crate
/// - `RUST_LOG=issue_tracker=debug,tower=info` - Different levels per crate
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init(format: LogFormat) -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().with_target(true).compact())
            .try_init(),
    };

    result.map_err(|e| {
        crate::IssueTrackerError::Other(format!("Failed to initialize tracing: {}", e))
    })
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init(LogFormat::Compact);
}
