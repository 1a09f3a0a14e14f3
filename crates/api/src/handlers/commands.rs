//! Handlers for the `/{org}/{repo}/commands` resource.
//!
//! Every path segment is sanitized before use (see
//! [`atc_core::commands::sanitize_segment`]) and every lookup matches on the
//! full `(id, organization, repository)` triple.

use atc_core::commands::{require_command_id, sanitize_command_id, Scope, ENTITY};
use atc_core::error::CoreError;
use atc_db::models::command::{Command, CommandInput, CreateCommand};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::{decoding, persistence, AppError, AppResult};
use crate::extract::{JsonBody, PathParams};
use crate::middleware::auth::Authorized;
use crate::state::AppState;

fn not_found(id: String) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// GET /{org}/{repo}/commands
///
/// Order is whatever the store returns.
pub async fn list_by_scope(
    _auth: Authorized,
    State(state): State<AppState>,
    PathParams((org, repo)): PathParams<(String, String)>,
) -> AppResult<Json<Vec<Command>>> {
    let scope = Scope::from_path(&org, &repo);

    let rows = state
        .store
        .list_by_scope(&scope)
        .await
        .map_err(persistence("list_commands"))?;

    let commands = rows
        .into_iter()
        .map(Command::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(decoding("list_commands"))?;
    Ok(Json(commands))
}

/// GET /{org}/{repo}/commands/{command_id}
pub async fn get_by_id(
    _auth: Authorized,
    State(state): State<AppState>,
    PathParams((org, repo, command_id)): PathParams<(String, String, String)>,
) -> AppResult<Json<Command>> {
    let scope = Scope::from_path(&org, &repo);
    let id = sanitize_command_id(&command_id);

    let row = state
        .store
        .find_scoped(&id, &scope)
        .await
        .map_err(persistence("get_command"))?
        .ok_or_else(|| not_found(id))?;

    let command = Command::try_from(row).map_err(decoding("get_command"))?;
    Ok(Json(command))
}

/// POST /{org}/{repo}/commands
///
/// Organization and repository come from the path; the body supplies
/// `name` and `data`. Responds 200 with the stored command.
pub async fn create(
    auth: Authorized,
    State(state): State<AppState>,
    PathParams((org, repo)): PathParams<(String, String)>,
    JsonBody(input): JsonBody<CommandInput>,
) -> AppResult<Json<Command>> {
    let scope = Scope::from_path(&org, &repo);
    scope.require_complete()?;
    let fields = input.validate()?;

    let row = state
        .store
        .create(&CreateCommand::new(scope, fields))
        .await
        .map_err(persistence("create_command"))?;

    tracing::info!(
        command_id = %row.id,
        organization = %row.organization,
        repository = %row.repository,
        caller = %auth.caller,
        "Command created",
    );

    let command = Command::try_from(row).map_err(decoding("create_command"))?;
    Ok(Json(command))
}

/// PUT /{org}/{repo}/commands/{command_id}
///
/// Replaces `name` and `data`. Responds 200 with an empty body.
pub async fn update(
    auth: Authorized,
    State(state): State<AppState>,
    PathParams((org, repo, command_id)): PathParams<(String, String, String)>,
    JsonBody(input): JsonBody<CommandInput>,
) -> AppResult<StatusCode> {
    let fields = input.validate()?;
    let scope = Scope::from_path(&org, &repo);
    let id = sanitize_command_id(&command_id);
    require_command_id(&id)?;

    let updated = state
        .store
        .update(&id, &scope, &fields)
        .await
        .map_err(persistence("update_command"))?;
    if !updated {
        return Err(not_found(id));
    }

    tracing::info!(
        command_id = %id,
        organization = %scope.organization,
        repository = %scope.repository,
        caller = %auth.caller,
        "Command updated",
    );

    Ok(StatusCode::OK)
}

/// DELETE /{org}/{repo}/commands/{command_id}
///
/// Hard delete. Responds 200 with an empty body.
pub async fn delete(
    auth: Authorized,
    State(state): State<AppState>,
    PathParams((org, repo, command_id)): PathParams<(String, String, String)>,
) -> AppResult<StatusCode> {
    let scope = Scope::from_path(&org, &repo);
    scope.require_complete()?;
    let id = sanitize_command_id(&command_id);
    require_command_id(&id)?;

    let deleted = state
        .store
        .delete(&id, &scope)
        .await
        .map_err(persistence("delete_command"))?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(
        command_id = %id,
        organization = %scope.organization,
        repository = %scope.repository,
        caller = %auth.caller,
        "Command deleted",
    );

    Ok(StatusCode::OK)
}
