//! Stable hashing for configuration identities.

use serde::Serialize;
use sha2::{Digest, Sha256};
use sweeplab_core::{to_canonical_json_bytes, LabError};

/// Computes a stable hexadecimal hash for the provided serializable payload.
///
/// The payload is encoded as canonical JSON first, so equal values hash
/// equally regardless of in-memory ordering.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, LabError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}
