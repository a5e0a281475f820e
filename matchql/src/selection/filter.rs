//! Filter records based on a predicate. Used wherever a rendered filter expression has to be checked against
//! records directly, rather than handed to a host that installs it as a display predicate.

use crate::ast::{ComparisonOperator, Expr, Identifier, Literal, Predicate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("property not found: {0}")]
    PropertyNotFound(String),
    #[error("cannot compare {left} with {right}")]
    TypeMismatch { left: &'static str, right: &'static str },
}

/// A record whose properties can be read by name. `None` means the record has no such property,
/// while a property holding no value is `Some(Literal::Null)`.
pub trait Filterable {
    fn value(&self, name: &str) -> Option<Literal>;
}

fn evaluate_expr<R: Filterable>(record: &R, expr: &Expr) -> Result<Literal, Error> {
    match expr {
        Expr::Literal(lit) => Ok(lit.clone()),
        Expr::Identifier(Identifier::Property(name)) => record.value(name).ok_or_else(|| Error::PropertyNotFound(name.clone())),
    }
}

/// Apply a comparison operator to two values of the same type
pub fn compare_ordered<T: PartialOrd + ?Sized>(operator: ComparisonOperator, left: &T, right: &T) -> bool {
    match operator {
        ComparisonOperator::Equal => left == right,
        ComparisonOperator::NotEqual => left != right,
        ComparisonOperator::GreaterThan => left > right,
        ComparisonOperator::GreaterThanOrEqual => left >= right,
        ComparisonOperator::LessThan => left < right,
        ComparisonOperator::LessThanOrEqual => left <= right,
    }
}

/// Compare two literals. Any comparison involving NULL is false; literals of different types never compare.
pub fn compare_literals(left: &Literal, operator: ComparisonOperator, right: &Literal) -> Result<bool, Error> {
    Ok(match (left, right) {
        (Literal::Null, _) | (_, Literal::Null) => false,
        (Literal::Integer(l), Literal::Integer(r)) => compare_ordered(operator, l, r),
        (Literal::Real(l), Literal::Real(r)) => compare_ordered(operator, l, r),
        (Literal::String(l), Literal::String(r)) => compare_ordered(operator, l.as_bytes(), r.as_bytes()),
        (Literal::Boolean(l), Literal::Boolean(r)) => compare_ordered(operator, l, r),
        (Literal::Date(l), Literal::Date(r)) => compare_ordered(operator, l, r),
        (l, r) => return Err(Error::TypeMismatch { left: l.type_name(), right: r.type_name() }),
    })
}

pub fn evaluate_predicate<R: Filterable>(record: &R, predicate: &Predicate) -> Result<bool, Error> {
    match predicate {
        Predicate::Comparison { left, operator, right } => {
            let left_val = evaluate_expr(record, left)?;
            let right_val = evaluate_expr(record, right)?;
            compare_literals(&left_val, *operator, &right_val)
        }
        Predicate::And(left, right) => Ok(evaluate_predicate(record, left)? && evaluate_predicate(record, right)?),
        Predicate::Or(left, right) => Ok(evaluate_predicate(record, left)? || evaluate_predicate(record, right)?),
        Predicate::Not(pred) => Ok(!evaluate_predicate(record, pred)?),
        Predicate::IsNull(expr) => Ok(matches!(evaluate_expr(record, expr)?, Literal::Null)),
        Predicate::True => Ok(true),
        Predicate::False => Ok(false),
    }
}

#[derive(Debug, PartialEq)]
pub enum FilterResult<R> {
    Pass(R),
    Skip(R),
    Error(R, Error),
}

pub struct FilterIterator<I> {
    iter: I,
    predicate: Predicate,
}

impl<I, R> FilterIterator<I>
where
    I: Iterator<Item = R>,
    R: Filterable,
{
    pub fn new(iter: I, predicate: Predicate) -> Self { Self { iter, predicate } }
}

impl<I, R> Iterator for FilterIterator<I>
where
    I: Iterator<Item = R>,
    R: Filterable,
{
    type Item = FilterResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|record| match evaluate_predicate(&record, &self.predicate) {
            Ok(true) => FilterResult::Pass(record),
            Ok(false) => FilterResult::Skip(record),
            Err(e) => FilterResult::Error(record, e),
        })
    }
}
