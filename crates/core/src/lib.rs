//! Domain rules for the command store.
//!
//! Pure functions only: path sanitation, required-field validation, the
//! text/JSON handling of command payloads and API-key digests. Nothing in
//! here touches the network or the database.

pub mod api_keys;
pub mod commands;
pub mod error;
pub mod types;
