use crate::ast::{ComparisonOperator, Expr, Identifier, Literal, Predicate};
use crate::error::ExpressionError;

fn generate_literal_sql(literal: &Literal, buffer: &mut String) -> Result<(), ExpressionError> {
    match literal {
        Literal::Integer(i) => buffer.push_str(&i.to_string()),
        Literal::Real(f) => {
            if !f.is_finite() {
                return Err(ExpressionError::NonFiniteReal(*f));
            }
            // Debug formatting always keeps a fraction or an exponent (1.0, 1e300), so reals never read back as integers
            buffer.push_str(&format!("{:?}", f));
        }
        Literal::Boolean(b) => buffer.push_str(if *b { "true" } else { "false" }),
        Literal::String(s) => push_quoted(buffer, s, '\''),
        Literal::Date(date) => {
            buffer.push_str("DATE '");
            buffer.push_str(&date.format("%Y-%m-%d").to_string());
            buffer.push('\'');
        }
        Literal::Null => buffer.push_str("NULL"),
    }
    Ok(())
}

fn generate_expr_sql(expr: &Expr, buffer: &mut String) -> Result<(), ExpressionError> {
    match expr {
        Expr::Literal(literal) => generate_literal_sql(literal, buffer),
        Expr::Identifier(Identifier::Property(name)) => {
            if name.is_empty() {
                return Err(ExpressionError::EmptyIdentifier);
            }
            push_quoted(buffer, name, '"');
            Ok(())
        }
    }
}

/// Quote a value, doubling any embedded quote character (SQL standard)
fn push_quoted(buffer: &mut String, value: &str, quote: char) {
    buffer.push(quote);
    for c in value.chars() {
        if c == quote {
            buffer.push(quote);
        }
        buffer.push(c);
    }
    buffer.push(quote);
}

fn comparison_op_to_sql(op: &ComparisonOperator) -> &'static str {
    match op {
        ComparisonOperator::Equal => "=",
        ComparisonOperator::NotEqual => "<>",
        ComparisonOperator::GreaterThan => ">",
        ComparisonOperator::GreaterThanOrEqual => ">=",
        ComparisonOperator::LessThan => "<",
        ComparisonOperator::LessThanOrEqual => "<=",
    }
}

/// Render a predicate as a portable filter expression, suitable for a host's layer subset/display filter
pub fn generate_filter_expression(predicate: &Predicate) -> Result<String, ExpressionError> {
    let mut buffer = String::new();
    generate_selection_sql_inner(predicate, &mut buffer)?;
    tracing::trace!("rendered filter expression: {}", buffer);
    Ok(buffer)
}

fn generate_selection_sql_inner(predicate: &Predicate, buffer: &mut String) -> Result<(), ExpressionError> {
    match predicate {
        Predicate::Comparison { left, operator, right } => {
            generate_expr_sql(left, buffer)?;
            buffer.push(' ');
            buffer.push_str(comparison_op_to_sql(operator));
            buffer.push(' ');
            generate_expr_sql(right, buffer)?;
        }
        Predicate::And(left, right) => {
            generate_selection_sql_inner(left, buffer)?;
            buffer.push_str(" AND ");
            generate_selection_sql_inner(right, buffer)?;
        }
        Predicate::Or(left, right) => {
            buffer.push('(');
            generate_selection_sql_inner(left, buffer)?;
            buffer.push_str(" OR ");
            generate_selection_sql_inner(right, buffer)?;
            buffer.push(')');
        }
        Predicate::Not(pred) => match pred.as_ref() {
            Predicate::IsNull(expr) => {
                generate_expr_sql(expr, buffer)?;
                buffer.push_str(" IS NOT NULL");
            }
            pred => {
                buffer.push_str("NOT (");
                generate_selection_sql_inner(pred, buffer)?;
                buffer.push(')');
            }
        },
        Predicate::IsNull(expr) => {
            generate_expr_sql(expr, buffer)?;
            buffer.push_str(" IS NULL");
        }
        Predicate::True => buffer.push_str("TRUE"),
        Predicate::False => buffer.push_str("FALSE"),
    }
    Ok(())
}
