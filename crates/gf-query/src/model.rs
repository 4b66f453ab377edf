//! A structural model type for decoded payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded payload object with typed key access.
///
/// Keys are in the host's snake_case (translation happens during envelope
/// decoding). Use this as the model type for schemaless access, or bind a
/// `Deserialize` struct to the fetcher for typed models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw value under the given key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The value under the given key as a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// The value under the given key as an integer.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    /// The value under the given key as a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// The object under the given key as a nested record.
    pub fn get_record(&self, key: &str) -> Option<Record> {
        self.get(key)?.as_object().cloned().map(Record)
    }

    /// The array under the given key as a sequence of nested records.
    ///
    /// Returns `None` if the key is absent, not an array, or contains a
    /// non-object element.
    pub fn get_records(&self, key: &str) -> Option<Vec<Record>> {
        self.get(key)?
            .as_array()?
            .iter()
            .map(|item| item.as_object().cloned().map(Record))
            .collect()
    }

    /// Returns true if the record has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Unwrap into the underlying map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}
