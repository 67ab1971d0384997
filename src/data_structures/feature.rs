//! Source features that model instances are placed for.

use std::collections::HashMap;

/// Key of the feature-id index.
///
/// Ids behave like object keys of the tile format: a string holding the
/// canonical decimal form of an integer and that integer resolve to the same
/// id. `"007"` or `"+7"` stay strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureId {
    Int(i64),
    String(String),
}

impl From<i64> for FeatureId {
    fn from(id: i64) -> Self {
        FeatureId::Int(id)
    }
}

impl From<i32> for FeatureId {
    fn from(id: i32) -> Self {
        FeatureId::Int(i64::from(id))
    }
}

impl From<u32> for FeatureId {
    fn from(id: u32) -> Self {
        FeatureId::Int(i64::from(id))
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(int) if int.to_string() == id => FeatureId::Int(int),
            _ => FeatureId::String(id.to_string()),
        }
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        FeatureId::from(id.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    String(String),
    Bool(bool),
}

impl PropertyValue {
    fn to_feature_id(&self) -> FeatureId {
        match self {
            PropertyValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                FeatureId::Int(*n as i64)
            }
            PropertyValue::Number(n) => FeatureId::String(n.to_string()),
            PropertyValue::String(s) => FeatureId::from(s.as_str()),
            PropertyValue::Bool(b) => FeatureId::String(b.to_string()),
        }
    }
}

/// A vector tile feature as seen by the query path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feature {
    pub id: Option<FeatureId>,
    pub properties: HashMap<String, PropertyValue>,
}

impl Feature {
    pub fn with_id(id: impl Into<FeatureId>) -> Self {
        Self {
            id: Some(id.into()),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: PropertyValue) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    /// The feature's own id, falling back to its `"id"` property.
    pub fn resolved_id(&self) -> Option<FeatureId> {
        self.id
            .clone()
            .or_else(|| self.properties.get("id").map(PropertyValue::to_feature_id))
    }
}
