//! Cache Key Module
//!
//! Content-addressed keys: identical inputs always map to the same key.

use sha2::{Digest, Sha256};

/// Unit separator between key parts, so `["ab", "c"]` and `["a", "bc"]` differ.
const PART_SEPARATOR: u8 = 0x1f;

/// Hashes a prompt text into a cache key.
pub fn hash_prompt(text: &str) -> String {
    cache_key(&[text])
}

/// Hashes a composite of parts (e.g. namespace, user id, task ids) into a key.
///
/// Returns the lowercase hex SHA-256 digest.
pub fn cache_key<S: AsRef<str>>(parts: &[S]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update([PART_SEPARATOR]);
        }
        hasher.update(part.as_ref().as_bytes());
    }

    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
