// btbphylo-core/src/domain/metadata.rs

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Audit counters collected across pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunMetadata(BTreeMap<String, JsonValue>);

impl RunMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Flattens the fields of a serializable struct into the log.
    pub fn record_all<T: Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        match serde_json::to_value(value)? {
            JsonValue::Object(fields) => self.0.extend(fields),
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "expected a struct, got {other}"
                )));
            }
        }
        Ok(())
    }

    /// Later values win.
    pub fn merge(&mut self, other: RunMetadata) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
