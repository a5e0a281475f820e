use chrono::NaiveDate;
use matchql::ast::Literal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Semantic type of a layer field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Integer,
    Real,
    Text,
    Date,
    Boolean,
}

impl FieldType {
    /// Whether values of this type have a meaningful order (and so accept relational operators)
    pub fn is_ordered(&self) -> bool { matches!(self, FieldType::Integer | FieldType::Real | FieldType::Date) }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// An attribute value as delivered by the host feature store
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Boolean(bool),
    Null,
}

impl Value {
    /// The field type this value belongs to, or `None` for NULL
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Integer(_) => Some(FieldType::Integer),
            Value::Real(_) => Some(FieldType::Real),
            Value::Text(_) => Some(FieldType::Text),
            Value::Date(_) => Some(FieldType::Date),
            Value::Boolean(_) => Some(FieldType::Boolean),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
}

/// Human-readable rendering used in notices: text is quoted, NULL is spelled out
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(int) => write!(f, "{}", int),
            Value::Real(real) => write!(f, "{}", real),
            Value::Text(text) => write!(f, "'{}'", text),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => f.write_str("NULL"),
        }
    }
}

impl From<&Value> for Literal {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(i) => Literal::Integer(*i),
            Value::Real(r) => Literal::Real(*r),
            Value::Text(s) => Literal::String(s.clone()),
            Value::Date(d) => Literal::Date(*d),
            Value::Boolean(b) => Literal::Boolean(*b),
            Value::Null => Literal::Null,
        }
    }
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(s) => Literal::String(s),
            other => Literal::from(&other),
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Integer(i) => Value::Integer(i),
            Literal::Real(r) => Value::Real(r),
            Literal::String(s) => Value::Text(s),
            Literal::Date(d) => Value::Date(d),
            Literal::Boolean(b) => Value::Boolean(b),
            Literal::Null => Value::Null,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self { Value::Integer(value) }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Real(value) }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Boolean(value) }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::Text(value.to_string()) }
}

impl From<String> for Value {
    fn from(value: String) -> Self { Value::Text(value) }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self { Value::Date(value) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self { value.map(Into::into).unwrap_or(Value::Null) }
}
