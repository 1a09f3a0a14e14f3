//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation and generation.
//!
//! Static API-key digests live in `atc_core::api_keys`.

pub mod jwt;
