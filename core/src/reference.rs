use crate::error::ExtractionError;
use crate::field::{FeatureId, FieldRef};
use crate::host::Feature;
use crate::value::{FieldType, Value};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The typed value a session matches against, and the feature it was read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceValue {
    value: Value,
    field_type: FieldType,
    feature: FeatureId,
}

impl ReferenceValue {
    pub fn value(&self) -> &Value { &self.value }
    pub fn field_type(&self) -> FieldType { self.field_type }
    /// Source feature, for highlighting
    pub fn feature(&self) -> FeatureId { self.feature }
}

impl Display for ReferenceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.value) }
}

/// Read the reference value for `field` from a clicked feature.
///
/// Never yields a null reference: a field without a value on this feature is `NullValue`, which is distinct
/// from the field being absent altogether.
pub fn extract<F: Feature + ?Sized>(feature: &F, field: &FieldRef) -> Result<ReferenceValue, ExtractionError> {
    let id = feature.id();
    let value = feature.attribute(&field.name).ok_or_else(|| ExtractionError::FieldMissing(field.name.clone()))?;
    let found = match value.field_type() {
        Some(found) => found,
        None => return Err(ExtractionError::NullValue { field: field.name.clone(), feature: id }),
    };
    if found != field.field_type {
        return Err(ExtractionError::TypeMismatch { field: field.name.clone(), expected: field.field_type, found });
    }
    if let Value::Real(real) = value {
        if !real.is_finite() {
            return Err(ExtractionError::NonFinite { field: field.name.clone(), feature: id });
        }
    }
    tracing::trace!("extracted reference {} from feature {}", value, id);
    Ok(ReferenceValue { value, field_type: found, feature: id })
}
