//! Command entity model, wire representation and DTOs.

use atc_core::commands::{decode_data, new_command_id, validate_fields, CommandFields, Scope};
use atc_core::error::CoreError;
use atc_core::types::{CommandId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `commands` table. `data` is the raw stored text.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CommandRow {
    pub id: CommandId,
    pub organization: String,
    pub repository: String,
    pub name: String,
    pub data: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A command as returned to API clients, with `data` decoded into JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub id: CommandId,
    pub organization: String,
    pub repository: String,
    pub name: String,
    pub data: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CommandRow> for Command {
    type Error = CoreError;

    /// Fails with [`CoreError::DataIntegrity`] when the stored `data` is not JSON.
    fn try_from(row: CommandRow) -> Result<Self, Self::Error> {
        let data = decode_data(&row.id, &row.data)?;
        Ok(Self {
            id: row.id,
            organization: row.organization,
            repository: row.repository,
            name: row.name,
            data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Request body for create and update: `{ "name": ..., "data": ... }`.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported by [`CommandInput::validate`] with a field-specific message
/// instead of a generic deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandInput {
    pub name: Option<String>,
    pub data: Option<serde_json::Value>,
}

impl CommandInput {
    pub fn validate(&self) -> Result<CommandFields, CoreError> {
        validate_fields(self.name.as_deref(), self.data.as_ref())
    }
}

/// DTO for inserting a new command. Organization and repository always come
/// from the URL path, never from the body.
#[derive(Debug, Clone)]
pub struct CreateCommand {
    pub id: CommandId,
    pub organization: String,
    pub repository: String,
    pub name: String,
    pub data: String,
}

impl CreateCommand {
    /// Assign a fresh id to a validated command under `scope`.
    pub fn new(scope: Scope, fields: CommandFields) -> Self {
        Self {
            id: new_command_id(),
            organization: scope.organization,
            repository: scope.repository,
            name: fields.name,
            data: fields.data,
        }
    }
}
