use std::collections::BTreeMap;

use sweeplab_artifacts::{Artifact, GenericArtifact, MetricValue, RunResult, ScalarMetrics};

fn scalars(name: &str, metric: &str, value: f64) -> Artifact {
    let mut metrics = BTreeMap::new();
    metrics.insert(metric.to_string(), MetricValue::Scalar(value));
    Artifact::ScalarMetrics(ScalarMetrics::new(name, metrics))
}

#[test]
fn get_returns_the_first_match() {
    let result = RunResult::new(
        "exp1",
        vec![
            scalars("eval", "acc", 0.9),
            scalars("eval", "acc", 0.1),
            Artifact::Generic(GenericArtifact::new("marker")),
        ],
        None,
    )
    .expect("result");

    match result.get("eval").expect("lookup") {
        Artifact::ScalarMetrics(metrics) => {
            assert_eq!(metrics.metrics.get("acc"), Some(&MetricValue::Scalar(0.9)));
        }
        other => panic!("expected scalar metrics, got {other:?}"),
    }
}

#[test]
fn missing_artifact_error_lists_known_names() {
    let result = RunResult::new(
        "exp1",
        vec![scalars("eval", "acc", 0.9), scalars("test", "acc", 0.8)],
        None,
    )
    .expect("result");

    let err = result.get("train").expect_err("missing must fail");
    assert_eq!(err.info().code, "artifact-missing");
    let known = err.info().context.get("known").expect("known names");
    assert!(known.contains("eval"));
    assert!(known.contains("test"));
}

#[test]
fn empty_names_are_rejected_at_construction() {
    let err = RunResult::new("", Vec::new(), None).expect_err("empty name must fail");
    assert_eq!(err.info().code, "result-empty-name");
}

#[test]
fn ensure_config_only_fills_the_gap() {
    let mut config = BTreeMap::new();
    config.insert("lr".to_string(), serde_json::json!(0.1));

    let mut without = RunResult::new("a", Vec::new(), None).expect("result");
    without.ensure_config(&config);
    assert_eq!(without.config(), Some(&config));

    let mut replacement = BTreeMap::new();
    replacement.insert("lr".to_string(), serde_json::json!(0.5));
    let mut with = RunResult::new("b", Vec::new(), Some(config.clone())).expect("result");
    with.ensure_config(&replacement);
    assert_eq!(with.config(), Some(&config));
}
