use std::time::Duration;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use taskboard_core::bootstrap::BootstrapState;

use crate::state::AppState;

/// Upper bound on the store ping; a hung store reads as unhealthy.
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` while the store is unreachable.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the store answered a ping.
    pub store_healthy: bool,
    /// Where the start-up bootstrapper currently is.
    pub bootstrap: BootstrapState,
}

/// GET /health -- returns service and store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = matches!(
        tokio::time::timeout(PING_TIMEOUT, state.tasks.store().ping()).await,
        Ok(Ok(()))
    );
    let bootstrap = state.bootstrap.borrow().clone();

    let status = if store_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
        bootstrap,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
