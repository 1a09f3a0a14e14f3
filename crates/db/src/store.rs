//! The store seam between handlers and persistence.

use async_trait::async_trait;
use atc_core::commands::{CommandFields, Scope};

use crate::models::command::{CommandRow, CreateCommand};
use crate::repositories::CommandRepo;
use crate::DbPool;

/// Persistence operations the HTTP layer needs.
///
/// Implementations return raw rows; decoding `data` is the caller's job so
/// that corrupt rows surface the same way regardless of the backend.
#[async_trait]
pub trait CommandStore: Send + Sync {
    async fn list_by_scope(&self, scope: &Scope) -> Result<Vec<CommandRow>, sqlx::Error>;

    async fn find_scoped(&self, id: &str, scope: &Scope) -> Result<Option<CommandRow>, sqlx::Error>;

    async fn create(&self, input: &CreateCommand) -> Result<CommandRow, sqlx::Error>;

    /// `Ok(false)` when no row matched id + scope.
    async fn update(&self, id: &str, scope: &Scope, fields: &CommandFields) -> Result<bool, sqlx::Error>;

    /// `Ok(false)` when no row matched id + scope.
    async fn delete(&self, id: &str, scope: &Scope) -> Result<bool, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// [`CommandStore`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgCommandStore {
    pool: DbPool,
}

impl PgCommandStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommandStore for PgCommandStore {
    async fn list_by_scope(&self, scope: &Scope) -> Result<Vec<CommandRow>, sqlx::Error> {
        CommandRepo::list_by_scope(&self.pool, scope).await
    }

    async fn find_scoped(&self, id: &str, scope: &Scope) -> Result<Option<CommandRow>, sqlx::Error> {
        CommandRepo::find_scoped(&self.pool, id, scope).await
    }

    async fn create(&self, input: &CreateCommand) -> Result<CommandRow, sqlx::Error> {
        CommandRepo::create(&self.pool, input).await
    }

    async fn update(&self, id: &str, scope: &Scope, fields: &CommandFields) -> Result<bool, sqlx::Error> {
        CommandRepo::update(&self.pool, id, scope, fields).await
    }

    async fn delete(&self, id: &str, scope: &Scope) -> Result<bool, sqlx::Error> {
        CommandRepo::delete(&self.pool, id, scope).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
