//! Portable filter expressions for attribute matching.
//!
//! A [`ast::Predicate`] is rendered to a host-portable, SQL-style string with
//! [`selection::sql::generate_filter_expression`], read back with [`parser::parse_selection`], and evaluated
//! directly against records with [`selection::filter::evaluate_predicate`].

pub mod ast;
pub mod conversion;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod selection;

pub use parser::parse_selection;
pub use selection::sql::generate_filter_expression;
