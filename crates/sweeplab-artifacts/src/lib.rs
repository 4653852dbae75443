//! Typed artifacts, the codec registry, and the run result bundle.

mod artifact;
mod registry;
mod result;

pub use artifact::{
    Artifact, GenericArtifact, HistorySource, MetricValue, ScalarMetrics, TrainingHistory,
    GENERIC_TAG, SCALAR_METRICS_TAG, TRAINING_HISTORY_TAG,
};
pub use registry::{ArtifactCodec, ArtifactRegistry, DecodeFn, EncodeFn};
pub use result::{ConfigSnapshot, RunResult, RESULT_TAG};
