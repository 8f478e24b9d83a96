//! Stable SHA256 digests of definition files

use crate::import::format::ApiDefinitionFile;
use sha2::{Digest, Sha256};

/// SHA256 hex digest of the definition's canonical JSON.
///
/// Struct fields serialize in declaration order and schema objects with
/// sorted keys, so formatting, key order and JSON-vs-YAML source do not
/// affect the digest.
pub fn compute_definition_digest(file: &ApiDefinitionFile) -> String {
    let canonical = serde_json::to_string(file).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
