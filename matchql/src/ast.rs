use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    Identifier(Identifier),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Real(f64),
    String(String),
    Boolean(bool),
    Date(NaiveDate),
    Null,
}

impl Literal {
    /// Short type name used in mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Integer(_) => "integer",
            Literal::Real(_) => "real",
            Literal::String(_) => "string",
            Literal::Boolean(_) => "boolean",
            Literal::Date(_) => "date",
            Literal::Null => "null",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identifier {
    Property(String),
}

impl Identifier {
    pub fn name(&self) -> &str {
        match self {
            Identifier::Property(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Comparison { left: Box<Expr>, operator: ComparisonOperator, right: Box<Expr> },
    IsNull(Box<Expr>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    True,
    False,
}

impl Predicate {
    /// `field <operator> literal`, the shape every click-derived predicate starts from
    pub fn compare(field: impl Into<String>, operator: ComparisonOperator, literal: Literal) -> Self {
        Predicate::Comparison {
            left: Box::new(Expr::Identifier(Identifier::Property(field.into()))),
            operator,
            right: Box::new(Expr::Literal(literal)),
        }
    }

    pub fn is_null(field: impl Into<String>) -> Self { Predicate::IsNull(Box::new(Expr::Identifier(Identifier::Property(field.into())))) }

    pub fn or(self, other: Predicate) -> Self { Predicate::Or(Box::new(self), Box::new(other)) }

    pub fn and(self, other: Predicate) -> Self { Predicate::And(Box::new(self), Box::new(other)) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equal,              // =
    NotEqual,           // <> or !=
    GreaterThan,        // >
    GreaterThanOrEqual, // >=
    LessThan,           // <
    LessThanOrEqual,    // <=
}
