//! Hashing helpers.

use std::path::Path;

use sha2::{Digest, Sha256};

/// SHA-256 of a string, hex encoded.
pub fn sha256_str(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short, stable identifier for an installation, derived from the path of
/// its query executable. Distinguishes output locations when several
/// installations are probed together.
pub fn installation_id(query_executable: &Path) -> String {
    let path = query_executable.to_string_lossy().replace('\\', "/");
    sha256_str(&path)[..16].to_string()
}
