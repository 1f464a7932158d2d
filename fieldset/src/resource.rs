//! Attribute-keyed mappings that fields read from and write to.
//!
//! `Resource` stands in for the backing model (a database row, an API record).
//! `Request` stands in for the incoming form payload. Both are thin wrappers
//! over a JSON object so the surrounding application can hand over whatever
//! its ORM or HTTP layer produced.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The backing data object a field resolves from and fills into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource {
    attributes: Map<String, Value>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    /// String value of an attribute, if it holds one.
    pub fn str(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).and_then(Value::as_str)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Write an attribute, replacing any previous value.
    pub fn set(&mut self, attribute: impl Into<String>, value: Value) {
        self.attributes.insert(attribute.into(), value);
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }
}

impl From<Map<String, Value>> for Resource {
    fn from(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }
}

/// The incoming payload of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Request {
    input: Map<String, Value>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.input.insert(attribute.into(), value.into());
        self
    }

    /// Input value for an attribute. `None` when the key was not sent at all,
    /// `Some(Value::Null)` when it was sent empty.
    pub fn input(&self, attribute: &str) -> Option<&Value> {
        self.input.get(attribute)
    }

    pub fn has(&self, attribute: &str) -> bool {
        self.input.contains_key(attribute)
    }

    pub fn all(&self) -> &Map<String, Value> {
        &self.input
    }
}

impl From<Map<String, Value>> for Request {
    fn from(input: Map<String, Value>) -> Self {
        Self { input }
    }
}
