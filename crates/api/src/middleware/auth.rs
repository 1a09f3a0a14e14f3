//! Authentication gate for the command routes.

use atc_core::api_keys::{api_key_matches, API_KEY_HEADER};
use atc_core::error::CoreError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::config::AuthConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Caller name recorded for requests authenticated by the static key.
pub const API_KEY_CALLER: &str = "api-key";

/// Caller name recorded for tokens without a `sub` claim.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Proof that the request passed the configured auth gate.
///
/// Put it first in a handler's argument list so the check runs before any
/// path or body extraction:
///
/// ```ignore
/// async fn my_handler(auth: Authorized, State(state): State<AppState>) -> AppResult<()> {
///     tracing::info!(caller = %auth.caller, "handling request");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authorized {
    /// Token subject, or a fixed marker for key-based and subject-less callers.
    pub caller: String,
}

impl FromRequestParts<AppState> for Authorized {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(&parts.headers, &state.config.auth)
    }
}

/// Check `headers` against the configured credentials.
pub fn authorize(headers: &HeaderMap, auth: &AuthConfig) -> Result<Authorized, AppError> {
    match auth {
        AuthConfig::Jwt(jwt) => authorize_bearer(headers, jwt),
        AuthConfig::ApiKey { key_hash } => authorize_api_key(headers, key_hash),
    }
}

fn authorize_bearer(headers: &HeaderMap, config: &JwtConfig) -> Result<Authorized, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

    let claims = validate_token(token.trim(), config).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        unauthorized("Invalid or expired token")
    })?;

    Ok(Authorized {
        caller: claims.sub.unwrap_or_else(|| ANONYMOUS_CALLER.to_string()),
    })
}

fn authorize_api_key(headers: &HeaderMap, key_hash: &str) -> Result<Authorized, AppError> {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing X-API-KEY header"))?;

    if !api_key_matches(presented, key_hash) {
        return Err(unauthorized("Invalid API key"));
    }

    Ok(Authorized {
        caller: API_KEY_CALLER.to_string(),
    })
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}
