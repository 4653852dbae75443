//! Cartesian expansion of a configuration space into concrete configs.

use std::collections::BTreeMap;

use serde_json::Value;
use sweeplab_core::{ErrorInfo, LabError};

use crate::space::{ConfigSpace, ConfigValue, SweepSpec};

/// One fully resolved point of the sweep space, containing only concrete
/// values.
pub type ConcreteConfig = BTreeMap<String, Value>;

/// Expands a configuration space into the full set of concrete configs.
///
/// Fixed entries are copied into every output. Swept entries contribute the
/// Cartesian product of their candidate values, iterated in declaration order
/// with the last declared sweep varying fastest, so emission order is
/// deterministic. A space with no sweeps expands to exactly one config equal
/// to the input.
///
/// A sweep with zero candidate values is rejected with a config error naming
/// the key; the alternative of emitting zero configs silently discards the
/// whole sweep.
pub fn expand(space: &ConfigSpace) -> Result<Vec<ConcreteConfig>, LabError> {
    let mut fixed = ConcreteConfig::new();
    let mut dynamic: Vec<(&String, &SweepSpec)> = Vec::new();
    for (key, value) in space.entries() {
        match value {
            ConfigValue::Fixed(value) => {
                fixed.insert(key.clone(), value.clone());
            }
            ConfigValue::Sweep(spec) => {
                if spec.is_empty() {
                    return Err(LabError::Config(
                        ErrorInfo::new("sweep-empty-items", "sweep declares no candidate values")
                            .with_context("key", key.clone())
                            .with_hint("declare at least one candidate value or drop the sweep"),
                    ));
                }
                dynamic.push((key, spec));
            }
        }
    }

    let mut outputs = Vec::new();
    fill_product(&dynamic, 0, fixed, &mut outputs);
    Ok(outputs)
}

fn fill_product(
    dynamic: &[(&String, &SweepSpec)],
    idx: usize,
    current: ConcreteConfig,
    outputs: &mut Vec<ConcreteConfig>,
) {
    if idx == dynamic.len() {
        outputs.push(current);
        return;
    }
    let (key, spec) = &dynamic[idx];
    for value in spec.items() {
        let mut next = current.clone();
        next.insert((*key).clone(), value.clone());
        fill_product(dynamic, idx + 1, next, outputs);
    }
}
