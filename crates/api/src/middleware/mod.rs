//! Request gates.
//!
//! - [`auth::Authorized`] -- Rejects the request with 401 unless it carries a
//!   valid credential for the configured auth mode.

pub mod auth;
