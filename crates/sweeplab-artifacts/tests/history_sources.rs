use std::collections::BTreeMap;

use serde_json::json;
use sweeplab_artifacts::{HistorySource, TrainingHistory};

#[test]
fn raw_curves_are_accepted() {
    let mut curves = BTreeMap::new();
    curves.insert("acc".to_string(), vec![0.1, 0.2]);
    let history =
        TrainingHistory::from_source("h", HistorySource::Curves(curves.clone())).expect("build");
    assert_eq!(history.name, "h");
    assert_eq!(history.metrics, curves);
}

#[test]
fn object_of_number_sequences_is_accepted() {
    let value = json!({"acc": [0.1, 0.2], "loss": [2.0, 1.5]});
    let history = TrainingHistory::from_source("h", HistorySource::Value(value)).expect("build");
    assert_eq!(history.metrics.get("acc"), Some(&vec![0.1, 0.2]));
    assert_eq!(history.metrics.get("loss"), Some(&vec![2.0, 1.5]));
}

#[test]
fn callback_snapshot_with_history_field_is_accepted() {
    let value = json!({
        "epochs": 2,
        "history": {"acc": [0.5, 0.6]},
    });
    let history = TrainingHistory::from_source("h", HistorySource::Value(value)).expect("build");
    assert_eq!(history.metrics.get("acc"), Some(&vec![0.5, 0.6]));
    assert_eq!(history.metrics.len(), 1);
}

#[test]
fn non_mapping_sources_fail_clearly() {
    let err = TrainingHistory::from_source("h", HistorySource::Value(json!([1, 2, 3])))
        .expect_err("sequence source must fail");
    assert_eq!(err.info().code, "history-source");
}

#[test]
fn non_numeric_curve_entries_fail_naming_the_metric() {
    let value = json!({"acc": [0.1, "oops"]});
    let err = TrainingHistory::from_source("h", HistorySource::Value(value))
        .expect_err("non numeric entry must fail");
    assert_eq!(err.info().code, "history-source");
    assert_eq!(err.info().context.get("metric").map(String::as_str), Some("acc"));
}

#[test]
fn scalar_curve_values_fail() {
    let value = json!({"acc": 0.9});
    let err = TrainingHistory::from_source("h", HistorySource::Value(value))
        .expect_err("scalar curve must fail");
    assert_eq!(err.info().code, "history-source");
}
