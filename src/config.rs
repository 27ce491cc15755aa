//! Snapshot of npm's effective configuration.
//!
//! The snapshot is whatever `npm config list --json` reported for one
//! location. It is read-only: changes go back through npm itself.

use crate::error::{Error, Result};
use crate::registry::{scope_from_registry_key, DEFAULT_REGISTRY_KEY};
use serde_json::{Map, Value};

/// Configuration reported by npm, in the order npm printed it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSnapshot {
    data: Map<String, Value>,
}

impl ConfigSnapshot {
    pub fn new(data: Map<String, Value>) -> Self {
        ConfigSnapshot { data }
    }

    /// Parse the JSON printed by `npm config list --json`.
    ///
    /// Anything other than a JSON object is rejected.
    pub fn from_json(command: &str, json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| Error::UnexpectedOutput {
            command: command.to_string(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(data) => Ok(ConfigSnapshot { data }),
            other => Err(Error::UnexpectedOutput {
                command: command.to_string(),
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Get a raw config value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Get a config value as a non-empty string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// The default registry, if one is configured.
    pub fn default_registry(&self) -> Option<&str> {
        self.get_str(DEFAULT_REGISTRY_KEY)
    }

    /// All `@scope:registry` entries as `(scope, url)` pairs, in snapshot order.
    ///
    /// Entries whose value is not a non-empty string are skipped.
    pub fn scoped_registries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.data.iter().filter_map(|(key, value)| {
            let scope = scope_from_registry_key(key)?;
            match value {
                Value::String(url) if !url.is_empty() => Some((scope, url.as_str())),
                _ => None,
            }
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl FromIterator<(String, Value)> for ConfigSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        ConfigSnapshot {
            data: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
