//! The named bundle of artifacts produced by one experiment run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sweeplab_core::{ErrorInfo, LabError, SchemaVersion};

use crate::artifact::Artifact;
use crate::registry::ArtifactRegistry;

/// Tag marking a serialized result payload.
pub const RESULT_TAG: &str = "result";

/// Concrete configuration snapshot attached to a result.
pub type ConfigSnapshot = BTreeMap<String, Value>;

/// The full named bundle of artifacts produced by one experiment run.
///
/// The name doubles as the storage key: two results with the same name
/// overwrite each other's persisted output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    name: String,
    artifacts: Vec<Artifact>,
    config: Option<ConfigSnapshot>,
}

impl RunResult {
    /// Creates a result bundle, validating the storage name.
    pub fn new(
        name: impl Into<String>,
        artifacts: Vec<Artifact>,
        config: Option<ConfigSnapshot>,
    ) -> Result<Self, LabError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LabError::Validation(
                ErrorInfo::new("result-empty-name", "result name must be a non-empty string")
                    .with_hint("the name doubles as the storage directory name"),
            ));
        }
        Ok(Self {
            name,
            artifacts,
            config,
        })
    }

    /// Returns the storage name identifying this result.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the artifacts in their declared order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Returns the concrete config snapshot, when one was recorded.
    pub fn config(&self) -> Option<&ConfigSnapshot> {
        self.config.as_ref()
    }

    /// Attaches a config snapshot unless one was already recorded.
    pub fn ensure_config(&mut self, config: &ConfigSnapshot) {
        if self.config.is_none() {
            self.config = Some(config.clone());
        }
    }

    /// Returns the first artifact with the given name.
    ///
    /// Duplicate names are legal at construction; earlier artifacts shadow
    /// later ones, and only the first is ever retrievable.
    pub fn get(&self, name: &str) -> Result<&Artifact, LabError> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.name() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = self.artifacts.iter().map(Artifact::name).collect();
                LabError::Contract(
                    ErrorInfo::new("artifact-missing", format!("no artifact named `{name}`"))
                        .with_context("known", known.join(", ")),
                )
            })
    }

    /// Converts the result into its tagged payload mapping.
    ///
    /// Each artifact is delegated to the registry and its tag folded into the
    /// payload, so the serialized form stays self-describing.
    pub fn to_payload(&self, registry: &ArtifactRegistry) -> Result<Value, LabError> {
        let mut artifacts = Vec::with_capacity(self.artifacts.len());
        for artifact in &self.artifacts {
            let (tag, mut payload) = registry.serialize(artifact)?;
            let obj = payload
                .as_object_mut()
                .ok_or_else(|| payload_shape("artifact payload must be a mapping"))?;
            obj.insert("tag".to_string(), Value::String(tag));
            artifacts.push(payload);
        }
        Ok(json!({
            "tag": RESULT_TAG,
            "schema_version": SchemaVersion::default(),
            "name": self.name,
            "artifacts": artifacts,
            "config": self.config,
        }))
    }

    /// Reconstructs a result from its tagged payload mapping.
    pub fn from_payload(payload: &Value, registry: &ArtifactRegistry) -> Result<Self, LabError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| payload_shape("result payload must be a mapping"))?;
        let tag = obj.get("tag").and_then(Value::as_str).unwrap_or_default();
        if tag != RESULT_TAG {
            return Err(LabError::UnknownTag(
                ErrorInfo::new(
                    "result-unknown-tag",
                    "top level payload does not carry the result tag",
                )
                .with_context("tag", tag),
            ));
        }
        check_schema_version(obj.get("schema_version"))?;
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| payload_shape("result payload is missing `name`"))?;

        let mut artifacts = Vec::new();
        if let Some(raw) = obj.get("artifacts") {
            let list = raw
                .as_array()
                .ok_or_else(|| payload_shape("`artifacts` must be a sequence"))?;
            for entry in list {
                let entry_obj = entry
                    .as_object()
                    .ok_or_else(|| payload_shape("artifact payload must be a mapping"))?;
                let artifact_tag = entry_obj
                    .get("tag")
                    .and_then(Value::as_str)
                    .ok_or_else(|| payload_shape("artifact payload is missing `tag`"))?;
                let mut body = entry_obj.clone();
                body.remove("tag");
                artifacts.push(registry.deserialize(artifact_tag, &Value::Object(body))?);
            }
        }

        let config = match obj.get("config") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value::<ConfigSnapshot>(value.clone())
                    .map_err(|err| payload_shape(&format!("`config` must be a mapping: {err}")))?,
            ),
        };

        RunResult::new(name, artifacts, config)
    }
}

fn check_schema_version(raw: Option<&Value>) -> Result<(), LabError> {
    let Some(raw) = raw else {
        // Payloads written before versions were stamped are still readable.
        return Ok(());
    };
    let version: SchemaVersion = serde_json::from_value(raw.clone())
        .map_err(|err| payload_shape(&format!("`schema_version` is malformed: {err}")))?;
    let supported = SchemaVersion::default();
    if version.major != supported.major {
        return Err(LabError::Serde(
            ErrorInfo::new("schema-version", "payload schema major version is unsupported")
                .with_context("found", format!("{}.{}.{}", version.major, version.minor, version.patch))
                .with_context("supported", format!("{}.x.x", supported.major)),
        ));
    }
    Ok(())
}

fn payload_shape(message: &str) -> LabError {
    LabError::Serde(ErrorInfo::new("payload-shape", message))
}
