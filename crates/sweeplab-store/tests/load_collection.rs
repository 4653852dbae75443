use std::collections::BTreeMap;
use std::fs;

use serde_json::json;
use sweeplab_artifacts::{Artifact, ArtifactRegistry, MetricValue, RunResult, ScalarMetrics};
use sweeplab_store::{ResultStore, LEGACY_FILE};
use tempfile::tempdir;

fn result(name: &str, acc: f64) -> RunResult {
    let mut metrics = BTreeMap::new();
    metrics.insert("acc".to_string(), MetricValue::Scalar(acc));
    RunResult::new(
        name,
        vec![Artifact::ScalarMetrics(ScalarMetrics::new("eval", metrics))],
        None,
    )
    .expect("result")
}

#[test]
fn corrupted_entries_are_reported_not_fatal() {
    let registry = ArtifactRegistry::with_builtins();
    let store = ResultStore::new(&registry);
    let base = tempdir().expect("base dir");

    store.save(&result("alpha", 0.9), base.path()).expect("save alpha");
    store.save(&result("beta", 0.8), base.path()).expect("save beta");

    let bad = base.path().join("gamma");
    fs::create_dir_all(&bad).expect("mkdir");
    fs::write(bad.join(LEGACY_FILE), b"\x00\x01garbage").expect("write garbage");

    let report = store.load_collection(base.path()).expect("collection");
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("gamma"));
    assert_eq!(report.failures[0].error.info().code, "bincode-deserialize");

    let mut names: Vec<&str> = report.results.iter().map(RunResult::name).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[test]
fn empty_subdirectories_are_reported_as_not_found() {
    let registry = ArtifactRegistry::with_builtins();
    let store = ResultStore::new(&registry);
    let base = tempdir().expect("base dir");

    store.save(&result("alpha", 0.9), base.path()).expect("save");
    fs::create_dir_all(base.path().join("empty")).expect("mkdir");

    let report = store.load_collection(base.path()).expect("collection");
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].error.info().code, "result-not-found");
}

#[test]
fn stray_files_in_the_base_directory_are_skipped() {
    let registry = ArtifactRegistry::with_builtins();
    let store = ResultStore::new(&registry);
    let base = tempdir().expect("base dir");

    store.save(&result("alpha", 0.9), base.path()).expect("save");
    fs::write(base.path().join("notes.txt"), "not a result").expect("write stray");

    let report = store.load_collection(base.path()).expect("collection");
    assert_eq!(report.results.len(), 1);
    assert!(report.failures.is_empty());
}

#[test]
fn unknown_tags_in_stored_payloads_surface_per_entry() {
    let registry = ArtifactRegistry::with_builtins();
    let store = ResultStore::new(&registry);
    let base = tempdir().expect("base dir");

    store.save(&result("alpha", 0.9), base.path()).expect("save");

    // Hand-write a payload carrying a tag nobody registered.
    let dir = base.path().join("custom");
    fs::create_dir_all(&dir).expect("mkdir");
    let payload = json!({
        "tag": "result",
        "name": "custom",
        "artifacts": [{"tag": "confusion_matrix", "name": "cm"}],
        "config": null,
    });
    let text = serde_yaml::to_string(&payload).expect("yaml");
    fs::write(dir.join("result.yaml"), text).expect("write yaml");

    let report = store.load_collection(base.path()).expect("collection");
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].error.info().code,
        "artifact-unknown-tag"
    );
}
