use serde_json::{Map, Value};
use std::fmt;

/// JSON field carrying the thing id in every serialized view.
pub const THING_ID_FIELD: &str = "thingId";

/// Identifier of a thing. Namespaced in the original wire format
/// (`org.example:device-1`), treated as an opaque string here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThingId(String);

impl ThingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ThingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A digital twin snapshot: identity plus the current attributes and features.
///
/// Attributes describe the thing itself (location, model, ...); features hold
/// the state of its functional aspects. Both are free-form JSON objects owned
/// by the backend; the gateway only ever serializes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    thing_id: ThingId,
    attributes: Option<Map<String, Value>>,
    features: Option<Map<String, Value>>,
}

impl Thing {
    pub fn new(thing_id: impl Into<ThingId>) -> Self {
        Self {
            thing_id: thing_id.into(),
            attributes: None,
            features: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_features(mut self, features: Map<String, Value>) -> Self {
        self.features = Some(features);
        self
    }

    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    /// Full JSON view of this thing. The id field is always present; absent
    /// attribute/feature sections are omitted rather than serialized as null.
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        root.insert(
            THING_ID_FIELD.to_string(),
            Value::String(self.thing_id.0.clone()),
        );
        if let Some(attributes) = &self.attributes {
            root.insert("attributes".to_string(), Value::Object(attributes.clone()));
        }
        if let Some(features) = &self.features {
            root.insert("features".to_string(), Value::Object(features.clone()));
        }
        Value::Object(root)
    }
}
