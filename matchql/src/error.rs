use crate::grammar;
use thiserror::Error;

/// Custom error type for parsing errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    SyntaxError(String),
    #[error("Empty expression")]
    EmptyExpression,
    #[error("Expected {expected}, got {got:?}")]
    UnexpectedRule { expected: &'static str, got: grammar::Rule },
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
    #[error("Missing {0} operand")]
    MissingOperand(&'static str),
}

impl From<pest::error::Error<grammar::Rule>> for ParseError {
    fn from(error: pest::error::Error<grammar::Rule>) -> Self { ParseError::SyntaxError(error.to_string()) }
}

/// Error type for filter expression rendering
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("real literal {0} has no portable representation")]
    NonFiniteReal(f64),
    #[error("empty field name")]
    EmptyIdentifier,
}
