//! Filesystem persistence for run results.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sweeplab_artifacts::{ArtifactRegistry, RunResult};
use sweeplab_core::{from_json_slice, to_canonical_json_bytes, ErrorInfo, LabError};

/// File name of the primary structured text serialization.
pub const PRIMARY_FILE: &str = "result.yaml";
/// File name of the legacy binary serialization.
pub const LEGACY_FILE: &str = "result.bin";

/// Serialization format chosen for a persisted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageFormat {
    /// Self-describing tagged YAML written through the artifact registry.
    Yaml,
    /// Binary snapshot of the full object graph, bypassing the registry.
    /// Written only when the primary encoding fails, read for backward
    /// compatibility with earlier runs.
    LegacyBinary,
}

/// Report describing one completed save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReport {
    /// Directory the result was written into.
    pub path: PathBuf,
    /// Format actually written.
    pub format: StorageFormat,
    /// Diagnostic captured when the primary encoding failed and the legacy
    /// format was written instead.
    pub fallback: Option<ErrorInfo>,
}

/// One failed entry from a batched load.
#[derive(Debug)]
pub struct LoadFailure {
    /// Subdirectory that failed to load.
    pub path: PathBuf,
    /// Error raised for this entry.
    pub error: LabError,
}

/// Outcome of a batched load: loaded results plus per entry failures.
#[derive(Debug, Default)]
pub struct CollectionReport {
    /// Successfully loaded results, in directory enumeration order.
    pub results: Vec<RunResult>,
    /// Entries that failed to load, with their errors.
    pub failures: Vec<LoadFailure>,
}

/// Stateless persistence layer for run results.
///
/// Holds a reference to the codec registry used by the primary format; all
/// persistent state lives under the caller supplied base directory.
#[derive(Debug)]
pub struct ResultStore<'a> {
    registry: &'a ArtifactRegistry,
}

impl<'a> ResultStore<'a> {
    /// Creates a store reading and writing through the given registry.
    pub fn new(registry: &'a ArtifactRegistry) -> Self {
        Self { registry }
    }

    /// Persists a result under `<base_dir>/<name>/`.
    ///
    /// The primary YAML encoding is attempted first; when the registry cannot
    /// encode the payload the legacy binary snapshot is written instead and
    /// the diagnostic recorded in the report, so a run is never aborted by a
    /// serialization failure. A second save with the same name overwrites the
    /// previous file. Nothing guards concurrent writers to one name; the last
    /// writer wins.
    pub fn save(&self, result: &RunResult, base_dir: &Path) -> Result<SaveReport, LabError> {
        let dir = base_dir.join(result.name());
        fs::create_dir_all(&dir).map_err(|err| store_error("store-create-dir", &dir, &err))?;
        match self.encode_primary(result) {
            Ok(text) => {
                let target = dir.join(PRIMARY_FILE);
                fs::write(&target, text).map_err(|err| store_error("store-write", &target, &err))?;
                remove_stale(&dir.join(LEGACY_FILE))?;
                Ok(SaveReport {
                    path: dir,
                    format: StorageFormat::Yaml,
                    fallback: None,
                })
            }
            Err(err) => {
                let bytes = encode_legacy(result)?;
                let target = dir.join(LEGACY_FILE);
                fs::write(&target, bytes)
                    .map_err(|err| store_error("store-write", &target, &err))?;
                remove_stale(&dir.join(PRIMARY_FILE))?;
                Ok(SaveReport {
                    path: dir,
                    format: StorageFormat::LegacyBinary,
                    fallback: Some(err.info().clone()),
                })
            }
        }
    }

    /// Loads one result from its directory.
    ///
    /// The legacy binary file is probed first, then the primary YAML file;
    /// when neither exists the load fails with a not-found error.
    pub fn load(&self, path: &Path) -> Result<RunResult, LabError> {
        let legacy = path.join(LEGACY_FILE);
        if legacy.exists() {
            let bytes = fs::read(&legacy).map_err(|err| store_error("store-read", &legacy, &err))?;
            return decode_legacy(&bytes);
        }
        let primary = path.join(PRIMARY_FILE);
        if primary.exists() {
            let text = fs::read_to_string(&primary)
                .map_err(|err| store_error("store-read", &primary, &err))?;
            let payload: Value = serde_yaml::from_str(&text).map_err(|err| {
                LabError::Serde(ErrorInfo::new("yaml-deserialize", err.to_string()))
            })?;
            return RunResult::from_payload(&payload, self.registry);
        }
        Err(LabError::Store(
            ErrorInfo::new("result-not-found", "no serialized result in directory")
                .with_context("path", path.display().to_string())
                .with_hint(format!("expected `{LEGACY_FILE}` or `{PRIMARY_FILE}`")),
        ))
    }

    /// Loads every result found in the immediate subdirectories of `dir`.
    ///
    /// Entries load independently: a failure is recorded in the report and
    /// the batch continues. Enumeration follows platform directory order,
    /// which is not guaranteed stable across file systems.
    pub fn load_collection(&self, dir: &Path) -> Result<CollectionReport, LabError> {
        let entries =
            fs::read_dir(dir).map_err(|err| store_error("store-read-dir", dir, &err))?;
        let mut report = CollectionReport::default();
        for entry in entries {
            let entry = entry.map_err(|err| store_error("store-read-dir", dir, &err))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match self.load(&path) {
                Ok(result) => report.results.push(result),
                Err(error) => report.failures.push(LoadFailure { path, error }),
            }
        }
        Ok(report)
    }

    fn encode_primary(&self, result: &RunResult) -> Result<String, LabError> {
        let payload = result.to_payload(self.registry)?;
        serde_yaml::to_string(&payload)
            .map_err(|err| LabError::Serde(ErrorInfo::new("yaml-serialize", err.to_string())))
    }
}

fn encode_legacy(result: &RunResult) -> Result<Vec<u8>, LabError> {
    let json = to_canonical_json_bytes(result)?;
    let json = String::from_utf8(json)
        .map_err(|err| LabError::Serde(ErrorInfo::new("legacy-utf8", err.to_string())))?;
    bincode::serialize(&json)
        .map_err(|err| LabError::Serde(ErrorInfo::new("bincode-serialize", err.to_string())))
}

fn decode_legacy(bytes: &[u8]) -> Result<RunResult, LabError> {
    let json: String = bincode::deserialize(bytes)
        .map_err(|err| LabError::Serde(ErrorInfo::new("bincode-deserialize", err.to_string())))?;
    from_json_slice(json.as_bytes())
}

fn remove_stale(path: &Path) -> Result<(), LabError> {
    if path.exists() {
        fs::remove_file(path).map_err(|err| store_error("store-remove", path, &err))?;
    }
    Ok(())
}

fn store_error(code: &str, path: &Path, err: &io::Error) -> LabError {
    LabError::Store(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}
