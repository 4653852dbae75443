//! Tabular aggregation exports over loaded result collections.

use std::path::Path;

use sweeplab_artifacts::{Artifact, MetricValue, RunResult};
use sweeplab_core::{ErrorInfo, LabError};

/// Flattens the scalar metrics of every result into one CSV table.
///
/// Rows are `(result, artifact, metric, value)`; vector metrics emit one row
/// per component. Artifacts other than scalar metrics are skipped.
pub fn export_metrics_csv(results: &[RunResult], out_path: &Path) -> Result<(), LabError> {
    let mut wtr = csv::Writer::from_path(out_path).map_err(|err| {
        LabError::Store(
            ErrorInfo::new("export-open", err.to_string())
                .with_context("path", out_path.display().to_string()),
        )
    })?;
    wtr.write_record(["result", "artifact", "metric", "value"])
        .map_err(wrap_csv)?;
    for result in results {
        for artifact in result.artifacts() {
            let Artifact::ScalarMetrics(scalars) = artifact else {
                continue;
            };
            for (metric, value) in &scalars.metrics {
                match value {
                    MetricValue::Scalar(v) => {
                        write_row(&mut wtr, result.name(), &scalars.name, metric, *v)?;
                    }
                    MetricValue::Vector(vs) => {
                        for v in vs {
                            write_row(&mut wtr, result.name(), &scalars.name, metric, *v)?;
                        }
                    }
                }
            }
        }
    }
    wtr.flush()
        .map_err(|err| wrap_csv(csv::Error::from(err)))
}

fn write_row<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    result: &str,
    artifact: &str,
    metric: &str,
    value: f64,
) -> Result<(), LabError> {
    let rendered = value.to_string();
    wtr.write_record([result, artifact, metric, rendered.as_str()])
        .map_err(wrap_csv)
}

fn wrap_csv(err: csv::Error) -> LabError {
    LabError::Store(ErrorInfo::new("export-write", "CSV export failure").with_hint(err.to_string()))
}
