//! Route definitions for the commands resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::commands;
use crate::state::AppState;

/// Routes for commands scoped by organization and repository.
///
/// ```text
/// GET    /{org}/{repo}/commands                  -> list_by_scope
/// POST   /{org}/{repo}/commands                  -> create
/// GET    /{org}/{repo}/commands/{command_id}     -> get_by_id
/// PUT    /{org}/{repo}/commands/{command_id}     -> update
/// DELETE /{org}/{repo}/commands/{command_id}     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{org}/{repo}/commands",
            get(commands::list_by_scope).post(commands::create),
        )
        .route(
            "/{org}/{repo}/commands/{command_id}",
            get(commands::get_by_id)
                .put(commands::update)
                .delete(commands::delete),
        )
}
