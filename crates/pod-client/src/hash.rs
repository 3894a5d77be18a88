//! Content hashing for sidecar file checks
//!
//! The sidecar reports the SHA-256 of each file it serves as lowercase hex,
//! so desired contents are fingerprinted the same way before comparing.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `contents`
#[must_use]
pub fn content_hash(contents: &str) -> String {
    hex::encode(Sha256::digest(contents.as_bytes()))
}

/// Whether a hash reported by the sidecar equals `expected`
#[must_use]
pub fn hash_matches(reported: &str, expected: &str) -> bool {
    reported.trim() == expected
}
