//! HTTP server for the issue API
//!
//! # Routes
//!
//! - `GET /api/issues/{project}` - List issues (query parameters filter)
//! - `POST /api/issues/{project}` - Create an issue
//! - `PUT /api/issues/{project}` - Update an issue (body: `_id` plus fields)
//! - `DELETE /api/issues/{project}` - Delete an issue (body: `_id`)
//! - `GET /health` - Liveness check
//!
//! # Example
//!
//! ```no_run
//! use issue_tracker::api::IssueServer;
//! use issue_tracker::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let server = IssueServer::connect(&config).expect("Failed to open storage");
//!
//!     server.run("127.0.0.1:3000").await.expect("Server failed");
//! }
//! ```

use super::extract::BodyFields;
use super::handler::IssueHandler;
use super::response::IssueResponse;
use crate::config::ServerConfig;
use crate::storage::{self, IssueStore, StoreError};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;

/// Default request body limit (1 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bind error: {0}")]
    Bind(String),
}

/// Shared server state
struct AppState {
    handler: IssueHandler,
}

/// HTTP server for the issue API
pub struct IssueServer {
    state: Arc<AppState>,
    max_body_size: usize,
}

impl IssueServer {
    /// Create a server around an already-open store
    pub fn new(store: Arc<dyn IssueStore>) -> Self {
        Self {
            state: Arc::new(AppState {
                handler: IssueHandler::new(store),
            }),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Open the configured store and create a server around it
    pub fn connect(config: &ServerConfig) -> Result<Self, ServerError> {
        let store = storage::connect(&config.database_url)?;
        Ok(Self::new(store).with_max_body_size(config.max_body_size))
    }

    /// Set the request body limit
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route(
                "/api/issues/{project}",
                get(list_issues)
                    .post(create_issue)
                    .put(update_issue)
                    .delete(delete_issue),
            )
            .layer(middleware::from_fn(log_requests))
            .layer(DefaultBodyLimit::max(self.max_body_size))
            .with_state(self.state.clone())
    }

    /// Run the server on the given address until Ctrl-C
    pub async fn run(self, addr: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("{}: {}", addr, e)))?;

        tracing::info!(
            addr = addr,
            max_body_size = self.max_body_size,
            "Issue server listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Io)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Request logging middleware
async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Handled request"
    );

    response
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_issues(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> IssueResponse {
    state.handler.list(&project, &query.into()).await
}

async fn create_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    BodyFields(params): BodyFields,
) -> IssueResponse {
    state.handler.create(&project, &params).await
}

async fn update_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    BodyFields(params): BodyFields,
) -> IssueResponse {
    state.handler.update(&project, &params).await
}

async fn delete_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    BodyFields(params): BodyFields,
) -> IssueResponse {
    state.handler.delete(&project, &params).await
}
