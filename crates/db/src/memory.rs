//! In-process [`CommandStore`] used by the API tests.
//!
//! Mirrors the SQL semantics: scoped matches on every read and write,
//! storage-assigned timestamps, `updated_at` refreshed on update, hard
//! deletes.

use async_trait::async_trait;
use atc_core::commands::{CommandFields, Scope};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::command::{CommandRow, CreateCommand};
use crate::store::CommandStore;

#[derive(Default)]
pub struct MemoryCommandStore {
    rows: RwLock<Vec<CommandRow>>,
}

impl MemoryCommandStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row as-is, bypassing validation. Lets tests plant rows
    /// another writer could have left behind, e.g. with corrupt `data`.
    pub async fn insert_raw(&self, row: CommandRow) {
        self.rows.write().await.push(row);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn in_scope(row: &CommandRow, scope: &Scope) -> bool {
    row.organization == scope.organization && row.repository == scope.repository
}

#[async_trait]
impl CommandStore for MemoryCommandStore {
    async fn list_by_scope(&self, scope: &Scope) -> Result<Vec<CommandRow>, sqlx::Error> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| in_scope(r, scope)).cloned().collect())
    }

    async fn find_scoped(&self, id: &str, scope: &Scope) -> Result<Option<CommandRow>, sqlx::Error> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id == id && in_scope(r, scope)).cloned())
    }

    async fn create(&self, input: &CreateCommand) -> Result<CommandRow, sqlx::Error> {
        let now = Utc::now();
        let row = CommandRow {
            id: input.id.clone(),
            organization: input.organization.clone(),
            repository: input.repository.clone(),
            name: input.name.clone(),
            data: input.data.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &str, scope: &Scope, fields: &CommandFields) -> Result<bool, sqlx::Error> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|r| r.id == id && in_scope(r, scope)) else {
            return Ok(false);
        };
        row.name = fields.name.clone();
        row.data = fields.data.clone();
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: &str, scope: &Scope) -> Result<bool, sqlx::Error> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.id == id && in_scope(r, scope)));
        Ok(rows.len() < before)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
