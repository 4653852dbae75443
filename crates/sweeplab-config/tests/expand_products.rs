use serde_json::json;
use sweeplab_config::{expand, ConfigSpace, ConfigValue, SweepSpec};

fn sweep(items: Vec<serde_json::Value>) -> ConfigValue {
    ConfigValue::Sweep(SweepSpec::new(items))
}

#[test]
fn no_sweeps_yields_the_input() {
    let mut space = ConfigSpace::new();
    space
        .insert("lr", ConfigValue::Fixed(json!(0.1)))
        .expect("insert");
    space
        .insert("model", ConfigValue::Fixed(json!("resnet")))
        .expect("insert");

    let configs = expand(&space).expect("expand");
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].get("lr"), Some(&json!(0.1)));
    assert_eq!(configs[0].get("model"), Some(&json!("resnet")));
    assert_eq!(configs[0].len(), 2);
}

#[test]
fn single_sweep_emits_items_in_order() {
    let mut space = ConfigSpace::new();
    space
        .insert("lr", ConfigValue::Fixed(json!(0.1)))
        .expect("insert");
    space
        .insert("aug", sweep(vec![json!("basic"), json!("strong")]))
        .expect("insert");

    let configs = expand(&space).expect("expand");
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0].get("lr"), Some(&json!(0.1)));
    assert_eq!(configs[0].get("aug"), Some(&json!("basic")));
    assert_eq!(configs[1].get("lr"), Some(&json!(0.1)));
    assert_eq!(configs[1].get("aug"), Some(&json!("strong")));
}

#[test]
fn later_sweeps_vary_fastest() {
    let mut space = ConfigSpace::new();
    space.insert("a", sweep(vec![json!(1), json!(2)])).expect("insert");
    space.insert("b", sweep(vec![json!("x"), json!("y")])).expect("insert");

    let configs = expand(&space).expect("expand");
    let pairs: Vec<(i64, String)> = configs
        .iter()
        .map(|c| {
            (
                c.get("a").and_then(|v| v.as_i64()).expect("a"),
                c.get("b").and_then(|v| v.as_str()).expect("b").to_string(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            (1, "x".to_string()),
            (1, "y".to_string()),
            (2, "x".to_string()),
            (2, "y".to_string()),
        ]
    );
}

#[test]
fn empty_sweep_fails_fast_naming_the_key() {
    let mut space = ConfigSpace::new();
    space
        .insert("depth", sweep(vec![json!(18), json!(50)]))
        .expect("insert");
    space.insert("width", sweep(vec![])).expect("insert");

    let err = expand(&space).expect_err("empty sweep must fail");
    assert_eq!(err.info().code, "sweep-empty-items");
    assert_eq!(err.info().context.get("key").map(String::as_str), Some("width"));
}

#[test]
fn empty_space_expands_to_one_empty_config() {
    let configs = expand(&ConfigSpace::new()).expect("expand");
    assert_eq!(configs.len(), 1);
    assert!(configs[0].is_empty());
}

#[test]
fn expansion_is_restartable() {
    let mut space = ConfigSpace::new();
    space
        .insert("k", sweep(vec![json!(1), json!(2), json!(3)]))
        .expect("insert");

    let first = expand(&space).expect("first expand");
    let second = expand(&space).expect("second expand");
    assert_eq!(first, second);
}
