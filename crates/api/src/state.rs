use std::sync::Arc;

use atc_db::CommandStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Command persistence. A PostgreSQL-backed store in production.
    pub store: Arc<dyn CommandStore>,
    /// Server configuration (read by the auth gate).
    pub config: Arc<ServerConfig>,
}
