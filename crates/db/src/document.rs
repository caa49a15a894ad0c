//! Schemaless documents and the partial-update patch applied to them.

use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Top-level fields of a stored document.
pub type Fields = Map<String, Value>;

/// A stored document: its id within the collection plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decode into a typed record. The document id is exposed as `id`
    /// and overrides any stored field of the same name.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Serialize a record into document fields. The record must serialize to
/// a JSON object.
pub fn to_fields<T: Serialize>(record: &T) -> StoreResult<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(serde_json::Error::custom(format!(
            "expected an object document, got {other}"
        )))),
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Partial update of a single document.
///
/// `set` overwrites top-level fields. `append` pushes an element onto an
/// array field as one atomic step with the rest of the patch, so concurrent
/// appends to the same field never lose each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub set: Fields,
    pub append: Vec<(String, Value)>,
}

impl DocumentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.set.insert(field.into(), value);
        self
    }

    pub fn append(mut self, field: impl Into<String>, value: Value) -> Self {
        self.append.push((field.into(), value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.append.is_empty()
    }

    /// Apply to an in-memory field map.
    ///
    /// Appending to a missing or null field starts a new array. Appending to
    /// a non-array value wraps it as the first element.
    pub fn apply(&self, fields: &mut Fields) {
        for (key, value) in &self.set {
            fields.insert(key.clone(), value.clone());
        }
        for (key, value) in &self.append {
            let slot = fields.entry(key.clone()).or_insert(Value::Null);
            match slot {
                Value::Array(items) => items.push(value.clone()),
                Value::Null => *slot = Value::Array(vec![value.clone()]),
                other => {
                    let previous = other.take();
                    *other = Value::Array(vec![previous, value.clone()]);
                }
            }
        }
    }
}
