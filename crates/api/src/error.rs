use atc_core::error::CoreError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Every handler failure, rendered as `{"error": ..., "code": ...}`.
///
/// Domain failures arrive as [`CoreError`]; store failures carry the
/// operation that issued them so the log line says what was attempted.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `atc_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store error, tagged with the operation that issued it.
    #[error("Database error during {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A stored row that no longer decodes, tagged with the operation that
    /// read it.
    #[error("Failed to decode stored data during {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: CoreError,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Handler return type.
pub type AppResult<T> = Result<T, AppError>;

/// Tag a store error with the operation name, for use with `map_err`.
///
/// ```ignore
/// let rows = state.store.list_by_scope(&scope).await.map_err(persistence("list_commands"))?;
/// ```
pub fn persistence(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |source| AppError::Persistence { operation, source }
}

/// Tag a row-decoding error with the operation name, for use with `map_err`.
pub fn decoding(operation: &'static str) -> impl FnOnce(CoreError) -> AppError {
    move |source| AppError::Decode { operation, source }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::DataIntegrity { entity, id, reason } => {
                    tracing::error!(entity, id = %id, reason = %reason, "Stored data failed to decode");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Persistence { operation, source } => classify_sqlx_error(operation, source),
            AppError::Decode { operation, source } => {
                tracing::error!(operation, error = %source, "Stored data failed to decode");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// `RowNotFound` is a 404. Anything else is logged with its operation and
/// surfaces as a generic 500, never the driver message.
fn classify_sqlx_error(operation: &str, err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(operation, error = %other, "Database error");
            internal()
        }
    }
}
