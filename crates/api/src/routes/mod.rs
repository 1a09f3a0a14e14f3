pub mod commands;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          health check (public)
///
/// /{org}/{repo}/commands                           list, create (auth required)
/// /{org}/{repo}/commands/{command_id}              get, update, delete (auth required)
/// ```
///
/// Authentication is enforced per handler through the
/// [`Authorized`](crate::middleware::auth::Authorized) extractor, so
/// unknown paths still 404 rather than 401.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(commands::router())
}
