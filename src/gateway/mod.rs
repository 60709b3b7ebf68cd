//! HTTP execution gateway.
//!
//! Exposes the execution boundary over HTTP:
//! - `POST /run` `{instruction}` -> `{success, stdout_tail?, stderr_tail?, duration}`
//! - `GET /health` -> `{status: "ok", service: "..."}`
//!
//! Execution failure is data, not an HTTP error: `/run` answers 200 with
//! `success=false` for timeouts, spawn faults, and non-zero exits. The
//! health probe is static liveness only - it proves nothing about the
//! device or model path.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::domain::ExecutionResult;
use crate::error::{PilotError, Result};
use crate::executor::CommandExecutor;

/// Service name reported by the health probe.
pub const SERVICE_NAME: &str = "screenpilot-gateway";

/// Maximum request body size - instructions are short
pub const MAX_BODY_SIZE: usize = 65_536;

/// Slack added on top of the execution timeout for the HTTP layer, so the
/// request timeout never fires before the executor's own bound does.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

/// Shared state for the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub executor: Arc<dyn CommandExecutor>,
}

/// Body of `POST /run`.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub instruction: String,
}

async fn handle_run(
    State(state): State<GatewayState>,
    Json(request): Json<RunRequest>,
) -> Json<ExecutionResult> {
    log::info!("gateway /run: \"{}\"", request.instruction);
    let result = state.executor.run(&request.instruction).await;
    Json(result)
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "service": SERVICE_NAME}))
}

/// Build the gateway router.
///
/// `exec_timeout` is the executor's own hard bound; the HTTP request
/// timeout is set just above it.
pub fn router(state: GatewayState, exec_timeout: Duration) -> Router {
    Router::new()
        .route("/run", post(handle_run))
        .route("/health", get(handle_health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(exec_timeout + REQUEST_TIMEOUT_SLACK))
        .with_state(state)
}

/// Bind and serve the gateway until the process exits.
pub async fn serve(
    addr: SocketAddr,
    executor: Arc<dyn CommandExecutor>,
    exec_timeout: Duration,
) -> Result<()> {
    let app = router(GatewayState { executor }, exec_timeout);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PilotError::Gateway(format!("failed to bind {}: {}", addr, e)))?;
    log::info!("gateway listening on {}", addr);
    axum::serve(listener, app)
        .await
        .map_err(|e| PilotError::Gateway(e.to_string()))
}
