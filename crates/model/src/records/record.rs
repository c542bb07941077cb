use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// A single catalogue entry as delivered by the data source.
///
/// The engine never assumes a fixed schema: fields are read by name and
/// interpreted through [`Value`]. Serialised transparently so a stored page
/// is a plain JSON array of the original objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(serde_json::Map<String, serde_json::Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.0.get(field)
    }

    /// Typed view of `field`; [`Value::Null`] when absent.
    pub fn value(&self, field: &str) -> Value {
        self.get(field).map(Value::from_json).unwrap_or(Value::Null)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|v| v.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.text("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn insert(&mut self, field: impl Into<String>, value: serde_json::Value) {
        self.0.insert(field.into(), value);
    }

    /// Builder-style variant of [`Record::insert`].
    pub fn with(mut self, field: impl Into<String>, value: serde_json::Value) -> Self {
        self.insert(field, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }

    pub fn into_map(self) -> serde_json::Map<String, serde_json::Value> {
        self.0
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Record(map)
    }
}

impl TryFrom<serde_json::Value> for Record {
    type Error = serde_json::Value;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Record(map)),
            other => Err(other),
        }
    }
}
