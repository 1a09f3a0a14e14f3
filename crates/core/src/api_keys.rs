//! Static API-key digests.
//!
//! The configured key is hashed once at startup and only the digest is kept
//! in memory. Incoming `X-API-KEY` values are hashed the same way and the
//! two digests compared.

use sha2::{Digest, Sha256};

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Compute the SHA-256 hex digest of an API key.
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a presented key against the stored digest.
///
/// Empty keys never match.
pub fn api_key_matches(presented: &str, expected_hash: &str) -> bool {
    if presented.is_empty() {
        return false;
    }
    hash_api_key(presented) == expected_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_sha256_hex() {
        let hash = hash_api_key("secret");
        assert_eq!(hash.len(), 64, "SHA-256 hex digest should be 64 chars");
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_input_produces_same_hash() {
        assert_eq!(hash_api_key("k-123"), hash_api_key("k-123"));
        assert_ne!(hash_api_key("k-123"), hash_api_key("k-124"));
    }

    #[test]
    fn matching_key_is_accepted() {
        let stored = hash_api_key("github-app-key");
        assert!(api_key_matches("github-app-key", &stored));
    }

    #[test]
    fn wrong_or_empty_key_is_rejected() {
        let stored = hash_api_key("github-app-key");
        assert!(!api_key_matches("github-app-kex", &stored));
        assert!(!api_key_matches("", &stored));
    }
}
