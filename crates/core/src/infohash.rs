//! Info-hash well-formedness rules.
//!
//! A v1 info-hash is the SHA-1 of the bencoded `info` dictionary of a
//! torrent descriptor, rendered as 40 lowercase hex characters. It is
//! the canonical content identity for magnet retrieval.

use crate::error::CoreError;

/// Temporary value assigned to an owned video before torrent encoding
/// has computed the real info-hash. Must never be visible to external
/// consumers (magnet generation, federation export).
pub const INFO_HASH_PLACEHOLDER: &str = "0123456789abcdef0123456789abcdef01234567";

/// Check that `hash` is exactly 40 lowercase hex characters.
pub fn is_well_formed(hash: &str) -> bool {
    hash.len() == 40
        && hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Validate an info-hash, rejecting malformed values.
pub fn validate(hash: &str) -> Result<(), CoreError> {
    if is_well_formed(hash) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Malformed info hash '{hash}': expected 40 lowercase hex characters"
        )))
    }
}
