//! Row structs and DTOs.
//!
//! - A `FromRow` struct matching the database row
//! - A `Serialize` wire struct returned by the API
//! - `Deserialize` input DTOs for request bodies

pub mod command;
