//! Error types for attribute matching.
//!
//! Per-feature problems (`EvaluationError`) are absorbed into a skipped count by the match set builder.
//! Everything else reaches the session boundary as a [`SessionError`], whose [`ErrorKind`] is what the
//! status signal and notices carry.

use crate::field::{FeatureId, LayerId};
use crate::operator::{EvaluationError, Operator};
use crate::value::FieldType;
use matchql::error::ExpressionError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Invalid layer, field or operator choice. Always raised before any scan.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("no target layer chosen")]
    MissingLayer,
    #[error("no target field chosen")]
    MissingField,
    #[error("layer {0} not found")]
    UnknownLayer(LayerId),
    #[error("layer {layer} has no field named {field}")]
    UnknownField { layer: LayerId, field: String },
    #[error("field {field} is declared {declared} but the layer stores {actual}")]
    FieldTypeMismatch { field: String, declared: FieldType, actual: FieldType },
    #[error("operator {operator} cannot be used on {field_type} fields")]
    UnsupportedOperator { operator: Operator, field_type: FieldType },
    #[error("unknown operator {0:?}")]
    UnknownOperator(String),
}

/// The clicked feature cannot supply a reference value
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("field {0} does not exist on the clicked feature")]
    FieldMissing(String),
    #[error("field {field} has no value on feature {feature}; pick a different feature")]
    NullValue { field: String, feature: FeatureId },
    #[error("field {field} holds a {found} value, expected {expected}")]
    TypeMismatch { field: String, expected: FieldType, found: FieldType },
    #[error("field {field} holds a non-finite number on feature {feature}")]
    NonFinite { field: String, feature: FeatureId },
}

/// Failures reported by the host feature store
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("layer {0} not found")]
    LayerNotFound(LayerId),
    #[error("layer {0} has an open edit session")]
    EditSessionActive(LayerId),
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("cannot render filter expression: {0}")]
    Expression(#[from] ExpressionError),
    #[error(transparent)]
    Evaluation(EvaluationError),
    #[error("scan cancelled")]
    Cancelled,
    #[error("scan worker failed: {0}")]
    Worker(String),
}

/// Fieldless error discriminant published in the session status and in notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Configuration,
    Extraction,
    EditSessionActive,
    HostApplyFailure,
    NoTarget,
    Inactive,
    Cancelled,
    Expression,
    ScanFailed,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{:?}", self) }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("no target layer and field configured")]
    NoTarget,
    #[error("tool is not active")]
    Inactive,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("cannot filter layer {0} while it has an open edit session")]
    EditSessionActive(LayerId),
    #[error("applying the match failed: {0}")]
    HostApply(StoreError),
    #[error("scan superseded by a newer click")]
    Cancelled,
    #[error(transparent)]
    Expression(ExpressionError),
    #[error("scan failed: {0}")]
    ScanFailed(String),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NoTarget => ErrorKind::NoTarget,
            SessionError::Inactive => ErrorKind::Inactive,
            SessionError::Configuration(_) => ErrorKind::Configuration,
            SessionError::Extraction(_) => ErrorKind::Extraction,
            SessionError::EditSessionActive(_) => ErrorKind::EditSessionActive,
            SessionError::HostApply(_) => ErrorKind::HostApplyFailure,
            SessionError::Cancelled => ErrorKind::Cancelled,
            SessionError::Expression(_) => ErrorKind::Expression,
            SessionError::ScanFailed(_) => ErrorKind::ScanFailed,
        }
    }
}

impl From<BuildError> for SessionError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Configuration(e) => SessionError::Configuration(e),
            BuildError::Expression(e) => SessionError::Expression(e),
            BuildError::Cancelled => SessionError::Cancelled,
            BuildError::Evaluation(e) => SessionError::ScanFailed(e.to_string()),
            BuildError::Worker(msg) => SessionError::ScanFailed(msg),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LayerNotFound(layer) => SessionError::Configuration(ConfigurationError::UnknownLayer(layer)),
            StoreError::EditSessionActive(layer) => SessionError::EditSessionActive(layer),
            other => SessionError::HostApply(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings document: {0}")]
    Malformed(#[from] serde_json::Error),
}
