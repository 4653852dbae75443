//! Canonical JSON helpers shared by the persistence and reporting layers.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{ErrorInfo, LabError};

/// Encodes a serializable value as canonical JSON bytes.
///
/// The value is routed through [`serde_json::Value`] so mapping keys are
/// emitted in sorted order and repeated encodings of equal values are byte
/// identical.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, LabError> {
    let value = serde_json::to_value(value)
        .map_err(|err| LabError::Serde(ErrorInfo::new("json-encode", err.to_string())))?;
    let mut bytes = serde_json::to_vec_pretty(&value)
        .map_err(|err| LabError::Serde(ErrorInfo::new("json-encode", err.to_string())))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes a value from a JSON byte slice.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LabError> {
    serde_json::from_slice(bytes)
        .map_err(|err| LabError::Serde(ErrorInfo::new("json-decode", err.to_string())))
}
