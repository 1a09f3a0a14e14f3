/// Domain-level error shared by the store and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Previously accepted data no longer decodes. Never the caller's fault.
    #[error("Data integrity violation: {entity} {id}: {reason}")]
    DataIntegrity {
        entity: &'static str,
        id: String,
        reason: String,
    },
}
