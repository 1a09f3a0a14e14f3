use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`. Always served with 200 so load balancers can
/// tell "process up, store down" apart from "process gone".
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the store ping fails.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn from_ping(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ping = state.store.health_check().await;
    if let Err(e) = &ping {
        tracing::warn!(error = %e, "Store ping failed");
    }
    Json(HealthResponse::from_ping(ping.is_ok()))
}

/// `/health`, mounted outside the auth gate.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
