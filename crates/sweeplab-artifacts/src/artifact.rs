//! Typed artifact payloads produced by experiment runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sweeplab_core::{ErrorInfo, LabError};

/// Tag identifying the [`Artifact::Generic`] variant.
pub const GENERIC_TAG: &str = "generic";
/// Tag identifying the [`Artifact::TrainingHistory`] variant.
pub const TRAINING_HISTORY_TAG: &str = "training_history";
/// Tag identifying the [`Artifact::ScalarMetrics`] variant.
pub const SCALAR_METRICS_TAG: &str = "scalar_metrics";

/// A single named, typed output of an experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    /// A named marker artifact with no payload.
    Generic(GenericArtifact),
    /// Named metric curves recorded over training epochs.
    TrainingHistory(TrainingHistory),
    /// Named scalar or short vector metrics.
    ScalarMetrics(ScalarMetrics),
}

impl Artifact {
    /// Returns the name identifying this artifact within its result.
    pub fn name(&self) -> &str {
        match self {
            Artifact::Generic(inner) => &inner.name,
            Artifact::TrainingHistory(inner) => &inner.name,
            Artifact::ScalarMetrics(inner) => &inner.name,
        }
    }

    /// Returns the registry tag for this artifact's variant.
    pub fn tag(&self) -> &str {
        match self {
            Artifact::Generic(_) => GENERIC_TAG,
            Artifact::TrainingHistory(_) => TRAINING_HISTORY_TAG,
            Artifact::ScalarMetrics(_) => SCALAR_METRICS_TAG,
        }
    }
}

/// Marker artifact carrying a name and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericArtifact {
    /// Identifier of the artifact within its result.
    pub name: String,
}

impl GenericArtifact {
    /// Creates a marker artifact with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Metric curves recorded once per epoch during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Identifier of the artifact within its result.
    pub name: String,
    /// Metric name to one recorded value per epoch.
    pub metrics: BTreeMap<String, Vec<f64>>,
}

/// Recognised source shapes for constructing a [`TrainingHistory`].
///
/// The enumerated shapes replace attribute probing on arbitrary objects:
/// anything outside this set fails with a validation error instead of being
/// guessed at.
#[derive(Debug, Clone, PartialEq)]
pub enum HistorySource {
    /// Metric curves already keyed by metric name.
    Curves(BTreeMap<String, Vec<f64>>),
    /// A JSON value: either an object of number sequences, or a training
    /// callback snapshot exposing such an object under a `history` field.
    Value(Value),
}

impl TrainingHistory {
    /// Creates a history artifact directly from metric curves.
    pub fn new(name: impl Into<String>, metrics: BTreeMap<String, Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            metrics,
        }
    }

    /// Builds a history artifact from one of the recognised source shapes.
    pub fn from_source(name: impl Into<String>, source: HistorySource) -> Result<Self, LabError> {
        let metrics = match source {
            HistorySource::Curves(metrics) => metrics,
            HistorySource::Value(value) => curves_from_value(&value)?,
        };
        Ok(Self {
            name: name.into(),
            metrics,
        })
    }
}

fn curves_from_value(value: &Value) -> Result<BTreeMap<String, Vec<f64>>, LabError> {
    // Callback snapshots wrap the curves under a `history` field.
    if let Some(inner) = value.as_object().and_then(|obj| obj.get("history")) {
        return parse_curves(inner);
    }
    parse_curves(value)
}

fn parse_curves(value: &Value) -> Result<BTreeMap<String, Vec<f64>>, LabError> {
    let obj = value.as_object().ok_or_else(|| {
        history_error("expected a mapping of metric names to number sequences", value, None)
    })?;
    let mut metrics = BTreeMap::new();
    for (metric, samples) in obj {
        let sequence = samples.as_array().ok_or_else(|| {
            history_error("metric curve must be a sequence of numbers", samples, Some(metric))
        })?;
        let mut curve = Vec::with_capacity(sequence.len());
        for sample in sequence {
            let number = sample.as_f64().ok_or_else(|| {
                history_error("metric curve entries must be numbers", sample, Some(metric))
            })?;
            curve.push(number);
        }
        metrics.insert(metric.clone(), curve);
    }
    Ok(metrics)
}

fn history_error(message: &str, value: &Value, metric: Option<&str>) -> LabError {
    let mut info = ErrorInfo::new("history-source", message).with_context("found", value.to_string());
    if let Some(metric) = metric {
        info = info.with_context("metric", metric);
    }
    LabError::Validation(info)
}

/// Scalar evaluation metrics, typically from a final evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarMetrics {
    /// Identifier of the artifact within its result.
    pub name: String,
    /// Metric name to its reported value.
    pub metrics: BTreeMap<String, MetricValue>,
}

impl ScalarMetrics {
    /// Creates a scalar metrics artifact with the given name.
    pub fn new(name: impl Into<String>, metrics: BTreeMap<String, MetricValue>) -> Self {
        Self {
            name: name.into(),
            metrics,
        }
    }
}

/// A reported metric: one number, or a short vector of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// A single scalar observation.
    Scalar(f64),
    /// A short vector of observations (per-class values, confidence bounds).
    Vector(Vec<f64>),
}
