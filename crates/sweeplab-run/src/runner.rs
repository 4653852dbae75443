//! Sweep driver: expand the space, invoke the experiment, persist each result.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sweeplab_artifacts::RunResult;
use sweeplab_config::{expand, stable_hash_string, ConcreteConfig, ConfigSpace};
use sweeplab_core::{ErrorInfo, LabError};
use sweeplab_store::{ResultStore, StorageFormat};

/// A user experiment invoked once per concrete configuration.
pub trait Experiment {
    /// Runs the experiment for one concrete configuration.
    fn run(&mut self, config: &ConcreteConfig) -> Result<RunResult, LabError>;
}

impl<F> Experiment for F
where
    F: FnMut(&ConcreteConfig) -> Result<RunResult, LabError>,
{
    fn run(&mut self, config: &ConcreteConfig) -> Result<RunResult, LabError> {
        self(config)
    }
}

/// Summary of one executed sweep job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Name of the result the job produced.
    pub result_name: String,
    /// Stable hash of the concrete configuration.
    pub config_hash: String,
    /// Storage format the result was persisted in.
    pub format: StorageFormat,
    /// Diagnostic recorded when the save fell back to the legacy format.
    pub fallback: Option<ErrorInfo>,
}

/// Results and per job records collected from one sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    /// One result per concrete configuration, in expansion order.
    pub results: Vec<RunResult>,
    /// One record per executed job, in the same order.
    pub jobs: Vec<JobRecord>,
}

/// Runs the experiment over every concrete configuration of the space.
///
/// Jobs execute sequentially in Cartesian product order and every result is
/// persisted as soon as its job completes. A failing invocation aborts the
/// remainder of the sweep; results saved before the failure stay on disk, but
/// there is no checkpointing to resume from. A result that carries no config
/// snapshot gets the concrete config that produced it attached before saving.
pub fn run_sweep<E: Experiment>(
    space: &ConfigSpace,
    experiment: &mut E,
    store: &ResultStore<'_>,
    artifact_dir: &Path,
) -> Result<SweepOutcome, LabError> {
    let configs = expand(space)?;
    let mut results = Vec::with_capacity(configs.len());
    let mut jobs = Vec::with_capacity(configs.len());
    for (idx, config) in configs.into_iter().enumerate() {
        let mut result = experiment
            .run(&config)
            .map_err(|err| contract_error(idx, &err))?;
        result.ensure_config(&config);
        let config_hash = stable_hash_string(&config)?;
        let report = store.save(&result, artifact_dir)?;
        jobs.push(JobRecord {
            result_name: result.name().to_string(),
            config_hash,
            format: report.format,
            fallback: report.fallback,
        });
        results.push(result);
    }
    Ok(SweepOutcome { results, jobs })
}

fn contract_error(job: usize, err: &LabError) -> LabError {
    LabError::Contract(
        ErrorInfo::new("experiment-failed", "experiment invocation failed; sweep aborted")
            .with_context("job", job.to_string())
            .with_hint(err.to_string()),
    )
}
