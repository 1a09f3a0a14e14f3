//! Repository for the `commands` table.

use atc_core::commands::{CommandFields, Scope};
use sqlx::PgPool;

use crate::models::command::{CommandRow, CreateCommand};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization, repository, name, data, created_at, updated_at";

/// Scoped CRUD over commands. Every statement binds its values; nothing is
/// interpolated into the SQL text except [`COLUMNS`].
pub struct CommandRepo;

impl CommandRepo {
    /// List every command under a scope. No ordering is applied.
    pub async fn list_by_scope(pool: &PgPool, scope: &Scope) -> Result<Vec<CommandRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM commands WHERE organization = $1 AND repository = $2");
        sqlx::query_as::<_, CommandRow>(&query)
            .bind(&scope.organization)
            .bind(&scope.repository)
            .fetch_all(pool)
            .await
    }

    /// Find a command by id within a scope.
    pub async fn find_scoped(
        pool: &PgPool,
        id: &str,
        scope: &Scope,
    ) -> Result<Option<CommandRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM commands
             WHERE id = $1 AND organization = $2 AND repository = $3"
        );
        sqlx::query_as::<_, CommandRow>(&query)
            .bind(id)
            .bind(&scope.organization)
            .bind(&scope.repository)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new command, returning the stored row.
    ///
    /// `created_at` and `updated_at` come from the column defaults.
    pub async fn create(pool: &PgPool, input: &CreateCommand) -> Result<CommandRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO commands (id, organization, repository, name, data)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommandRow>(&query)
            .bind(&input.id)
            .bind(&input.organization)
            .bind(&input.repository)
            .bind(&input.name)
            .bind(&input.data)
            .fetch_one(pool)
            .await
    }

    /// Replace `name` and `data`. Returns `true` if a row in scope was updated.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        scope: &Scope,
        fields: &CommandFields,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE commands SET name = $1, data = $2
             WHERE id = $3 AND organization = $4 AND repository = $5",
        )
        .bind(&fields.name)
        .bind(&fields.data)
        .bind(id)
        .bind(&scope.organization)
        .bind(&scope.repository)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a command. Returns `true` if a row in scope was removed.
    pub async fn delete(pool: &PgPool, id: &str, scope: &Scope) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM commands WHERE id = $1 AND organization = $2 AND repository = $3",
        )
        .bind(id)
        .bind(&scope.organization)
        .bind(&scope.repository)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
