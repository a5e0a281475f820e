use crate::error::ConfigurationError;
use crate::value::{FieldType, Value};
use matchql::ast::ComparisonOperator;
use matchql::selection::filter::compare_ordered;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Comparison applied as `candidate <operator> reference`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=", alias = "<>")]
    NotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
}

impl Operator {
    pub const ALL: [Operator; 6] =
        [Operator::Equal, Operator::NotEqual, Operator::LessThan, Operator::GreaterThan, Operator::LessOrEqual, Operator::GreaterOrEqual];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
        }
    }

    /// Display name shown in operator pickers
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equal => "Equal",
            Operator::NotEqual => "Not Equal",
            Operator::LessThan => "Less Than",
            Operator::LessOrEqual => "Less or Equal",
            Operator::GreaterThan => "Greater Than",
            Operator::GreaterOrEqual => "Greater or Equal",
        }
    }

    pub fn is_relational(&self) -> bool { !matches!(self, Operator::Equal | Operator::NotEqual) }

    /// Relational operators need an ordered field type. Equality works on every type.
    pub fn supports(&self, field_type: FieldType) -> bool { !self.is_relational() || field_type.is_ordered() }

    pub fn check(&self, field_type: FieldType) -> Result<(), ConfigurationError> {
        if self.supports(field_type) {
            Ok(())
        } else {
            Err(ConfigurationError::UnsupportedOperator { operator: *self, field_type })
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.symbol()) }
}

impl FromStr for Operator {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<>" => Ok(Operator::NotEqual),
            symbol => Operator::ALL.into_iter().find(|op| op.symbol() == symbol).ok_or_else(|| ConfigurationError::UnknownOperator(s.to_string())),
        }
    }
}

impl From<Operator> for ComparisonOperator {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Equal => ComparisonOperator::Equal,
            Operator::NotEqual => ComparisonOperator::NotEqual,
            Operator::LessThan => ComparisonOperator::LessThan,
            Operator::LessOrEqual => ComparisonOperator::LessThanOrEqual,
            Operator::GreaterThan => ComparisonOperator::GreaterThan,
            Operator::GreaterOrEqual => ComparisonOperator::GreaterThanOrEqual,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch { expected: FieldType, found: FieldType },
    #[error("operator {operator} cannot compare {field_type} values")]
    UnsupportedOperator { operator: Operator, field_type: FieldType },
    #[error("reference value is null")]
    NullReference,
}

pub type MatchDecision = Result<bool, EvaluationError>;

/// Test `candidate <operator> reference`.
///
/// A null candidate matches only under NotEqual. Values of a different type than the reference are a
/// `TypeMismatch`: there is no promotion between Integer and Real. Text compares byte for byte and reals
/// compare exactly.
pub fn evaluate(operator: Operator, reference: &Value, candidate: &Value) -> MatchDecision {
    let field_type = reference.field_type().ok_or(EvaluationError::NullReference)?;
    if !operator.supports(field_type) {
        return Err(EvaluationError::UnsupportedOperator { operator, field_type });
    }
    let op = ComparisonOperator::from(operator);
    match (reference, candidate) {
        (_, Value::Null) => Ok(operator == Operator::NotEqual),
        (Value::Integer(r), Value::Integer(c)) => Ok(compare_ordered(op, c, r)),
        (Value::Real(r), Value::Real(c)) => Ok(compare_ordered(op, c, r)),
        (Value::Date(r), Value::Date(c)) => Ok(compare_ordered(op, c, r)),
        (Value::Text(r), Value::Text(c)) => Ok(compare_ordered(op, c.as_bytes(), r.as_bytes())),
        (Value::Boolean(r), Value::Boolean(c)) => Ok(compare_ordered(op, c, r)),
        (_, candidate) => Err(EvaluationError::TypeMismatch {
            expected: field_type,
            // a null candidate was handled above
            found: candidate.field_type().unwrap_or(field_type),
        }),
    }
}
