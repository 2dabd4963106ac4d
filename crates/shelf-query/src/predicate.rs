//! Compiles query statements into record predicates for in-process evaluation.
//!
//! Every operator becomes a small closure capturing its field name and
//! literal; statements are combined with AND/OR combinators. Compiled
//! predicates hold no mutable state and can be shared between threads.

use crate::error::{QueryError, Result};
use crate::types::{Expression, ExpressionStatement, Operator, QueryStatement};
use crate::value::{Record, Value, NULL};
use std::cmp::Ordering;

/// A compiled test against a single record
pub type Predicate = Box<dyn Fn(&Record) -> bool + Send + Sync>;

/// Compile a statement into a predicate.
///
/// Fails on the first operator whose literal it cannot use.
pub fn compile(statement: &QueryStatement) -> Result<Predicate> {
    match statement {
        QueryStatement::Expression(expression) => compile_expression_statement(expression),
        QueryStatement::And(statements) => {
            let predicates = compile_all(statements)?;
            Ok(Box::new(move |record| predicates.iter().all(|p| p(record))))
        }
        QueryStatement::Or(statements) => {
            let predicates = compile_all(statements)?;
            Ok(Box::new(move |record| predicates.iter().any(|p| p(record))))
        }
    }
}

/// Check that a literal can be used with an operator.
///
/// Membership operators need a list, string-match operators need a string.
pub fn validate_operand(field: &str, operator: Operator, literal: &Value) -> Result<()> {
    match operator {
        Operator::In | Operator::NotIn if literal.as_list().is_none() => Err(
            QueryError::invalid_operand(field, operator, "list", literal.type_name()),
        ),
        op if op.is_string_match() && literal.as_str().is_none() => Err(
            QueryError::invalid_operand(field, operator, "string", literal.type_name()),
        ),
        _ => Ok(()),
    }
}

fn compile_all(statements: &[QueryStatement]) -> Result<Vec<Predicate>> {
    statements.iter().map(compile).collect()
}

fn compile_expression_statement(statement: &ExpressionStatement) -> Result<Predicate> {
    let predicates = statement
        .fields
        .iter()
        .map(|(field, expression)| compile_field(field, expression))
        .collect::<Result<Vec<_>>>()?;

    Ok(Box::new(move |record| predicates.iter().all(|p| p(record))))
}

fn compile_field(field: &str, expression: &Expression) -> Result<Predicate> {
    let predicates = expression
        .iter()
        .map(|(operator, literal)| compile_operator(field, *operator, literal))
        .collect::<Result<Vec<_>>>()?;

    Ok(Box::new(move |record| predicates.iter().all(|p| p(record))))
}

fn field_value<'a>(record: &'a Record, field: &str) -> &'a Value {
    record.get(field).unwrap_or(&NULL)
}

fn compile_ordering(field: String, literal: Value, accept: fn(Ordering) -> bool) -> Predicate {
    Box::new(move |record| {
        field_value(record, &field)
            .compare(&literal)
            .is_some_and(accept)
    })
}

fn compile_string_match(field: String, needle: String, test: fn(&str, &str) -> bool) -> Predicate {
    Box::new(move |record| {
        field_value(record, &field)
            .as_str()
            .is_some_and(|haystack| test(haystack, &needle))
    })
}

fn compile_operator(field: &str, operator: Operator, literal: &Value) -> Result<Predicate> {
    validate_operand(field, operator, literal)?;

    let field = field.to_string();
    let literal = literal.clone();

    let predicate: Predicate = match operator {
        Operator::Equals => Box::new(move |record| *field_value(record, &field) == literal),
        Operator::NotEquals => Box::new(move |record| *field_value(record, &field) != literal),
        Operator::LessThan => compile_ordering(field, literal, |o| o == Ordering::Less),
        Operator::LessThanOrEquals => compile_ordering(field, literal, |o| o != Ordering::Greater),
        Operator::GreaterThan => compile_ordering(field, literal, |o| o == Ordering::Greater),
        Operator::GreaterThanOrEquals => compile_ordering(field, literal, |o| o != Ordering::Less),
        Operator::In | Operator::NotIn => {
            let items = match literal {
                Value::List(items) => items,
                _ => Vec::new(),
            };
            let negate = operator == Operator::NotIn;
            Box::new(move |record| {
                let value = field_value(record, &field);
                items.iter().any(|item| item == value) != negate
            })
        }
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            let needle = match literal {
                Value::String(s) => s,
                _ => String::new(),
            };
            let test: fn(&str, &str) -> bool = match operator {
                Operator::Contains => |haystack, needle| haystack.contains(needle),
                Operator::StartsWith => |haystack, needle| haystack.starts_with(needle),
                _ => |haystack, needle| haystack.ends_with(needle),
            };
            compile_string_match(field, needle, test)
        }
    };

    Ok(predicate)
}
