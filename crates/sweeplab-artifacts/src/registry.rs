//! Tag keyed codec registry for polymorphic artifact (de)serialization.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sweeplab_core::{ErrorInfo, LabError};

use crate::artifact::{
    Artifact, GenericArtifact, ScalarMetrics, TrainingHistory, GENERIC_TAG, SCALAR_METRICS_TAG,
    TRAINING_HISTORY_TAG,
};

/// Encodes an artifact into its payload mapping (tag excluded).
pub type EncodeFn = Box<dyn Fn(&Artifact) -> Result<Value, LabError> + Send + Sync>;
/// Decodes an artifact from its payload mapping.
pub type DecodeFn = Box<dyn Fn(&Value) -> Result<Artifact, LabError> + Send + Sync>;

/// Paired converters registered for one artifact tag.
pub struct ArtifactCodec {
    /// Converter from artifact to payload mapping.
    pub encode: EncodeFn,
    /// Converter from payload mapping back to artifact.
    pub decode: DecodeFn,
}

/// Maps artifact tags to their payload converters.
///
/// The registry is an explicit value constructed once at startup and passed
/// by reference into the persistence layer. Registration order is
/// deterministic; re-registering a tag replaces the previous codec.
pub struct ArtifactRegistry {
    codecs: BTreeMap<String, ArtifactCodec>,
}

impl ArtifactRegistry {
    /// Creates an empty registry with no codecs.
    pub fn new() -> Self {
        Self {
            codecs: BTreeMap::new(),
        }
    }

    /// Creates a registry with codecs for the built-in artifact variants.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(GENERIC_TAG, generic_codec());
        registry.register(TRAINING_HISTORY_TAG, training_history_codec());
        registry.register(SCALAR_METRICS_TAG, scalar_metrics_codec());
        registry
    }

    /// Associates a tag with converters; a codec already registered for the
    /// tag is replaced.
    pub fn register(&mut self, tag: impl Into<String>, codec: ArtifactCodec) {
        self.codecs.insert(tag.into(), codec);
    }

    /// Removes the codec for a tag. Returns true when one was registered.
    pub fn unregister(&mut self, tag: &str) -> bool {
        self.codecs.remove(tag).is_some()
    }

    /// Returns true when a codec is registered for the tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.codecs.contains_key(tag)
    }

    /// Returns the registered tags in sorted order.
    pub fn tags(&self) -> Vec<&str> {
        self.codecs.keys().map(String::as_str).collect()
    }

    /// Serializes an artifact into its `(tag, payload)` pair.
    ///
    /// The payload always includes the artifact's `name`.
    pub fn serialize(&self, artifact: &Artifact) -> Result<(String, Value), LabError> {
        let tag = artifact.tag();
        let codec = self.codecs.get(tag).ok_or_else(|| unknown_tag(tag))?;
        let payload = (codec.encode)(artifact)?;
        Ok((tag.to_string(), payload))
    }

    /// Deserializes an artifact from a tag and payload mapping.
    ///
    /// Fails with an unknown-tag error when no codec is registered; the
    /// payload is never guessed at.
    pub fn deserialize(&self, tag: &str, payload: &Value) -> Result<Artifact, LabError> {
        let codec = self.codecs.get(tag).ok_or_else(|| unknown_tag(tag))?;
        (codec.decode)(payload)
    }
}

impl Default for ArtifactRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ArtifactRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

fn generic_codec() -> ArtifactCodec {
    ArtifactCodec {
        encode: Box::new(|artifact| match artifact {
            Artifact::Generic(inner) => encode_payload(inner),
            other => Err(codec_mismatch(GENERIC_TAG, other)),
        }),
        decode: Box::new(|payload| Ok(Artifact::Generic(decode_payload::<GenericArtifact>(payload)?))),
    }
}

fn training_history_codec() -> ArtifactCodec {
    ArtifactCodec {
        encode: Box::new(|artifact| match artifact {
            Artifact::TrainingHistory(inner) => encode_payload(inner),
            other => Err(codec_mismatch(TRAINING_HISTORY_TAG, other)),
        }),
        decode: Box::new(|payload| {
            Ok(Artifact::TrainingHistory(decode_payload::<TrainingHistory>(
                payload,
            )?))
        }),
    }
}

fn scalar_metrics_codec() -> ArtifactCodec {
    ArtifactCodec {
        encode: Box::new(|artifact| match artifact {
            Artifact::ScalarMetrics(inner) => encode_payload(inner),
            other => Err(codec_mismatch(SCALAR_METRICS_TAG, other)),
        }),
        decode: Box::new(|payload| {
            Ok(Artifact::ScalarMetrics(decode_payload::<ScalarMetrics>(
                payload,
            )?))
        }),
    }
}

fn encode_payload<T: Serialize>(value: &T) -> Result<Value, LabError> {
    serde_json::to_value(value)
        .map_err(|err| LabError::Serde(ErrorInfo::new("payload-encode", err.to_string())))
}

fn decode_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, LabError> {
    serde_json::from_value(payload.clone())
        .map_err(|err| LabError::Serde(ErrorInfo::new("payload-shape", err.to_string())))
}

fn codec_mismatch(tag: &str, artifact: &Artifact) -> LabError {
    LabError::Serde(
        ErrorInfo::new("codec-mismatch", "artifact variant does not match the codec tag")
            .with_context("tag", tag)
            .with_context("artifact_tag", artifact.tag()),
    )
}

fn unknown_tag(tag: &str) -> LabError {
    LabError::UnknownTag(
        ErrorInfo::new("artifact-unknown-tag", "no codec registered for artifact tag")
            .with_context("tag", tag)
            .with_hint("register the codec before serializing or deserializing"),
    )
}
