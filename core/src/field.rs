use crate::error::ConfigurationError;
use crate::operator::Operator;
use crate::value::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Host identifier of a map layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self { Self(id.to_string()) }
}

impl From<String> for LayerId {
    fn from(id: String) -> Self { Self(id) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub i64);

impl Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "#{}", self.0) }
}

impl From<i64> for FeatureId {
    fn from(id: i64) -> Self { Self(id) }
}

/// A field name together with its declared semantic type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldRef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self { Self { name: name.into(), field_type } }
}

impl Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{} ({})", self.name, self.field_type) }
}

/// Layer, field and operator a session matches against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub layer: LayerId,
    pub field: FieldRef,
    pub operator: Operator,
}

impl Target {
    /// Checks everything that can be checked without the feature store
    pub fn new(layer: impl Into<LayerId>, field: FieldRef, operator: Operator) -> Result<Self, ConfigurationError> {
        let layer = layer.into();
        if layer.is_empty() {
            return Err(ConfigurationError::MissingLayer);
        }
        if field.name.is_empty() {
            return Err(ConfigurationError::MissingField);
        }
        operator.check(field.field_type)?;
        Ok(Self { layer, field, operator })
    }
}
