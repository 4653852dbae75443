//! Configuration space types with embedded sweep markers.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sweeplab_core::{ErrorInfo, LabError};

/// Ordered candidate values declared for a single configuration key.
///
/// A sweep may be constructed empty; [`crate::expand`] rejects empty sweeps
/// instead of silently discarding the whole space.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSpec {
    items: Vec<Value>,
}

impl SweepSpec {
    /// Creates a sweep over the provided candidate values.
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// Returns the declared candidate values in order.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Returns the number of candidate values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the sweep declares no candidate values.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A single configuration value: fixed, or swept over candidates.
///
/// On the wire a sweep is a mapping with the single key `sweep` holding a
/// sequence; every other value is fixed. A fixed mapping that happens to use
/// that exact shape cannot be expressed: the marker key is reserved.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// A concrete scalar or structured value.
    Fixed(Value),
    /// A sweep marker expanded into one concrete config per item.
    Sweep(SweepSpec),
}

/// Insertion ordered configuration mapping declared by the experimenter.
///
/// Key order is preserved from the source document; it fixes the emission
/// order of [`crate::expand`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSpace {
    entries: Vec<(String, ConfigValue)>,
}

impl ConfigSpace {
    /// Creates an empty configuration space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, rejecting duplicate keys.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) -> Result<(), LabError> {
        let key = key.into();
        if self.entries.iter().any(|(existing, _)| existing == &key) {
            return Err(LabError::Config(
                ErrorInfo::new("config-duplicate-key", "configuration key declared twice")
                    .with_context("key", key),
            ));
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Returns the entries in declaration order.
    pub fn entries(&self) -> &[(String, ConfigValue)] {
        &self.entries
    }

    /// Returns the value declared for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns the number of declared keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no keys are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a configuration space from YAML text, preserving key order.
    pub fn from_yaml_str(text: &str) -> Result<Self, LabError> {
        serde_yaml::from_str(text)
            .map_err(|err| LabError::Serde(ErrorInfo::new("yaml-deserialize", err.to_string())))
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Fixed(value) => value.serialize(serializer),
            ConfigValue::Sweep(spec) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("sweep", spec.items())?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        interpret(raw).map_err(de::Error::custom)
    }
}

fn interpret(raw: Value) -> Result<ConfigValue, LabError> {
    let items = match sweep_items(&raw) {
        Some(items) => items.clone(),
        None => return Ok(ConfigValue::Fixed(raw)),
    };
    if let Some(nested) = items.iter().find(|item| sweep_items(item).is_some()) {
        return Err(LabError::Config(
            ErrorInfo::new("config-nested-sweep", "sweep items must be concrete values")
                .with_context("item", nested.to_string()),
        ));
    }
    Ok(ConfigValue::Sweep(SweepSpec::new(items)))
}

fn sweep_items(value: &Value) -> Option<&Vec<Value>> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get("sweep")?.as_array()
}

impl Serialize for ConfigSpace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConfigSpace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpaceVisitor;

        impl<'de> Visitor<'de> for SpaceVisitor {
            type Value = ConfigSpace;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of configuration keys to values or sweep markers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ConfigSpace, A::Error> {
                let mut space = ConfigSpace::new();
                while let Some((key, value)) = access.next_entry::<String, ConfigValue>()? {
                    space.insert(key, value).map_err(de::Error::custom)?;
                }
                Ok(space)
            }
        }

        deserializer.deserialize_map(SpaceVisitor)
    }
}
