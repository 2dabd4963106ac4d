use crate::types::Operator;
use thiserror::Error;

/// Errors raised while evaluating a query statement
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The literal given to an operator has a type the operator cannot use
    #[error("Invalid operand for {operator} on field '{field}': expected {expected}, got {actual}")]
    InvalidOperand {
        field: String,
        operator: Operator,
        expected: &'static str,
        actual: &'static str,
    },
}

impl QueryError {
    /// Create an invalid operand error
    pub fn invalid_operand(
        field: impl Into<String>,
        operator: Operator,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        QueryError::InvalidOperand {
            field: field.into(),
            operator,
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
