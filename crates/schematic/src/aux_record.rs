//! Auxiliary per-cell documents.
//!
//! An `AuxRecord` is an ordered key→value document (JSON object semantics).
//! Raw records read from the world may contain anything; records stored in a
//! `Blueprint` have been through the sanitizer and only carry
//! configuration-bearing fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuxRecord(Map<String, Value>);

impl AuxRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value. Only objects are valid documents.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fields in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_json_string(&self) -> String {
        self.to_string()
    }

    /// Parse a stored document. Anything but a JSON object is an error.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Whether `needle` appears as a value anywhere in the document tree.
    pub fn contains_value(&self, needle: &Value) -> bool {
        self.0.values().any(|v| value_contains(v, needle))
    }

    /// Whether `key` names a field anywhere in the document tree.
    pub fn contains_key_deep(&self, key: &str) -> bool {
        self.0
            .iter()
            .any(|(k, v)| k == key || value_contains_key(v, key))
    }
}

impl fmt::Display for AuxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<Map<String, Value>> for AuxRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn value_contains(haystack: &Value, needle: &Value) -> bool {
    if haystack == needle {
        return true;
    }
    match haystack {
        Value::Array(items) => items.iter().any(|v| value_contains(v, needle)),
        Value::Object(map) => map.values().any(|v| value_contains(v, needle)),
        _ => false,
    }
}

fn value_contains_key(haystack: &Value, key: &str) -> bool {
    match haystack {
        Value::Array(items) => items.iter().any(|v| value_contains_key(v, key)),
        Value::Object(map) => map
            .iter()
            .any(|(k, v)| k == key || value_contains_key(v, key)),
        _ => false,
    }
}
