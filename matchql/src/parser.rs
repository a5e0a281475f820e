use crate::ast;
use crate::error::ParseError;
use crate::grammar::{MatchqlParser, Rule};
use chrono::NaiveDate;
use pest::iterators::Pair;
use pest::Parser;

/// Print a parse tree node and its children recursively
#[cfg(test)]
fn print_tree(pair: Pair<Rule>, indent: usize) {
    if matches!(pair.as_rule(), Rule::EOI) {
        return;
    }
    println!("{:indent$}{:?}: '{}'", "", pair.as_rule(), pair.as_str().trim(), indent = indent);
    for inner in pair.into_inner() {
        print_tree(inner, indent + 2);
    }
}

/// Parse a filter expression into a predicate AST.
/// The input must be a single boolean expression built from comparisons, IS [NOT] NULL, AND, OR and NOT.
pub fn parse_selection(input: &str) -> Result<ast::Predicate, ParseError> {
    let mut pairs = MatchqlParser::parse(Rule::Selection, input)?;

    // Selection is silent, so the first pair is the Expr itself
    let expr = pairs.next().ok_or(ParseError::EmptyExpression)?;

    #[cfg(test)]
    print_tree(expr.clone(), 0);

    if expr.as_rule() != Rule::Expr {
        return Err(ParseError::UnexpectedRule { expected: "Expr", got: expr.as_rule() });
    }
    parse_expr(expr)
}

/// Expr := Conjunction (OR Conjunction)*
fn parse_expr(pair: Pair<Rule>) -> Result<ast::Predicate, ParseError> {
    let mut pairs = pair.into_inner();
    let first = pairs.next().ok_or(ParseError::MissingOperand("first"))?;
    let mut result = parse_conjunction(first)?;

    while let Some(op) = pairs.next() {
        if op.as_rule() != Rule::Or {
            return Err(ParseError::UnexpectedRule { expected: "Or", got: op.as_rule() });
        }
        let right = pairs.next().ok_or(ParseError::MissingOperand("right"))?;
        result = ast::Predicate::Or(Box::new(result), Box::new(parse_conjunction(right)?));
    }
    Ok(result)
}

/// Conjunction := Negation (AND Negation)*
fn parse_conjunction(pair: Pair<Rule>) -> Result<ast::Predicate, ParseError> {
    if pair.as_rule() != Rule::Conjunction {
        return Err(ParseError::UnexpectedRule { expected: "Conjunction", got: pair.as_rule() });
    }
    let mut pairs = pair.into_inner();
    let first = pairs.next().ok_or(ParseError::MissingOperand("first"))?;
    let mut result = parse_negation(first)?;

    while let Some(op) = pairs.next() {
        if op.as_rule() != Rule::And {
            return Err(ParseError::UnexpectedRule { expected: "And", got: op.as_rule() });
        }
        let right = pairs.next().ok_or(ParseError::MissingOperand("right"))?;
        result = ast::Predicate::And(Box::new(result), Box::new(parse_negation(right)?));
    }
    Ok(result)
}

/// Negation := NOT* Atom
fn parse_negation(pair: Pair<Rule>) -> Result<ast::Predicate, ParseError> {
    let mut negations = 0usize;
    let mut atom = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::Not => negations += 1,
            _ => atom = Some(parse_atom(inner)?),
        }
    }

    let mut predicate = atom.ok_or(ParseError::EmptyExpression)?;
    for _ in 0..negations {
        predicate = ast::Predicate::Not(Box::new(predicate));
    }
    Ok(predicate)
}

fn parse_atom(pair: Pair<Rule>) -> Result<ast::Predicate, ParseError> {
    match pair.as_rule() {
        Rule::ExpressionInParentheses => {
            let inner = pair.into_inner().next().ok_or(ParseError::EmptyExpression)?;
            parse_expr(inner)
        }
        Rule::NullCheck => {
            let mut inner = pair.into_inner();
            let operand = parse_operand(inner.next().ok_or(ParseError::MissingOperand("null check"))?)?;
            let is_null = ast::Predicate::IsNull(Box::new(operand));
            // Is, then an optional Not, then NullLiteral
            if inner.any(|p| p.as_rule() == Rule::Not) {
                Ok(ast::Predicate::Not(Box::new(is_null)))
            } else {
                Ok(is_null)
            }
        }
        Rule::Comparison => {
            let mut inner = pair.into_inner();
            let left = parse_operand(inner.next().ok_or(ParseError::MissingOperand("left"))?)?;
            let op = inner.next().ok_or(ParseError::MissingOperand("operator"))?;
            let operator = comparison_operator(op.as_rule())?;
            let right = parse_operand(inner.next().ok_or(ParseError::MissingOperand("right"))?)?;
            Ok(ast::Predicate::Comparison { left: Box::new(left), operator, right: Box::new(right) })
        }
        Rule::True => Ok(ast::Predicate::True),
        Rule::False => Ok(ast::Predicate::False),
        got => Err(ParseError::UnexpectedRule { expected: "predicate", got }),
    }
}

fn comparison_operator(rule: Rule) -> Result<ast::ComparisonOperator, ParseError> {
    Ok(match rule {
        Rule::Eq => ast::ComparisonOperator::Equal,
        Rule::NotEq => ast::ComparisonOperator::NotEqual,
        Rule::Gt => ast::ComparisonOperator::GreaterThan,
        Rule::GtEq => ast::ComparisonOperator::GreaterThanOrEqual,
        Rule::Lt => ast::ComparisonOperator::LessThan,
        Rule::LtEq => ast::ComparisonOperator::LessThanOrEqual,
        got => return Err(ParseError::UnexpectedRule { expected: "comparison operator", got }),
    })
}

fn parse_operand(pair: Pair<Rule>) -> Result<ast::Expr, ParseError> {
    let literal = match pair.as_rule() {
        Rule::Identifier => return parse_identifier(pair),
        Rule::StringLiteral => ast::Literal::String(unquote(pair.as_str(), '\'')),
        Rule::Integer => ast::Literal::Integer(
            pair.as_str().parse::<i64>().map_err(|e| ParseError::InvalidLiteral(format!("{}: {}", pair.as_str(), e)))?,
        ),
        Rule::Real => {
            ast::Literal::Real(pair.as_str().parse::<f64>().map_err(|e| ParseError::InvalidLiteral(format!("{}: {}", pair.as_str(), e)))?)
        }
        Rule::BooleanLiteral => ast::Literal::Boolean(pair.as_str().eq_ignore_ascii_case("true")),
        Rule::NullLiteral => ast::Literal::Null,
        Rule::DateLiteral => {
            let text = pair.into_inner().next().ok_or(ParseError::MissingOperand("date"))?;
            let raw = unquote(text.as_str(), '\'');
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| ParseError::InvalidLiteral(format!("{}: {}", raw, e)))?;
            ast::Literal::Date(date)
        }
        got => return Err(ParseError::UnexpectedRule { expected: "operand", got }),
    };
    Ok(ast::Expr::Literal(literal))
}

fn parse_identifier(pair: Pair<Rule>) -> Result<ast::Expr, ParseError> {
    let ident = pair.into_inner().next().ok_or(ParseError::MissingOperand("identifier"))?;
    let name = match ident.as_rule() {
        Rule::QuotedIdentifier => unquote(ident.as_str(), '"'),
        Rule::BareIdentifier => ident.as_str().to_string(),
        got => return Err(ParseError::UnexpectedRule { expected: "identifier", got }),
    };
    Ok(ast::Expr::Identifier(ast::Identifier::Property(name)))
}

/// Strip the surrounding quote characters and collapse doubled quotes
fn unquote(raw: &str, quote: char) -> String {
    let inner = raw.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)).unwrap_or(raw);
    let doubled: String = [quote, quote].iter().collect();
    inner.replace(&doubled, &quote.to_string())
}
