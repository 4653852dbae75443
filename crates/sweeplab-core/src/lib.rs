#![deny(missing_docs)]
#![doc = "Core error and schema types shared across the sweeplab crates."]

pub mod errors;
pub mod provenance;
pub mod serde;

pub use errors::{ErrorInfo, LabError};
pub use provenance::SchemaVersion;
pub use serde::{from_json_slice, to_canonical_json_bytes};
