use crate::ast::{Literal, Predicate};
use crate::error::ParseError;
use crate::parser;
use std::convert::TryFrom;

impl<'a> TryFrom<&'a str> for Predicate {
    type Error = ParseError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> { parser::parse_selection(value) }
}

impl TryFrom<String> for Predicate {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> { parser::parse_selection(&value) }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self { Literal::Integer(value) }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self { Literal::Real(value) }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self { Literal::Boolean(value) }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self { Literal::String(value.to_string()) }
}

impl From<String> for Literal {
    fn from(value: String) -> Self { Literal::String(value) }
}

impl From<chrono::NaiveDate> for Literal {
    fn from(value: chrono::NaiveDate) -> Self { Literal::Date(value) }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self { value.map(Into::into).unwrap_or(Literal::Null) }
}
