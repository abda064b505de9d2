//! Error types for expression evaluation.

use bitcalc_core::CalcError;
use std::fmt;

/// Expression evaluation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// Nothing to evaluate
    EmptyExpression,
    /// Character that is not part of the expression language
    UnexpectedChar {
        /// Offending character
        ch: char,
        /// Byte offset
        position: usize,
    },
    /// Malformed numeral
    InvalidNumber(String),
    /// Token in a position the grammar does not allow
    UnexpectedToken(String),
    /// Input ended in the middle of an expression
    UnexpectedEnd,
    /// `(` without `)` or the reverse
    UnbalancedParen,
    /// Division or remainder by zero
    DivisionByZero,
    /// Parentheses nested past the parser's limit
    TooDeep,
    /// Stored text that typing could not have produced
    InvalidText(String),
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExpression => write!(f, "empty expression"),
            Self::UnexpectedChar { ch, position } => {
                write!(f, "unexpected character '{ch}' at {position}")
            }
            Self::InvalidNumber(text) => write!(f, "invalid number: {text}"),
            Self::UnexpectedToken(token) => write!(f, "unexpected token: {token}"),
            Self::UnexpectedEnd => write!(f, "unexpected end of expression"),
            Self::UnbalancedParen => write!(f, "unbalanced parenthesis"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::TooDeep => write!(f, "expression nested too deeply"),
            Self::InvalidText(text) => write!(f, "not a valid expression line: {text:?}"),
        }
    }
}

impl std::error::Error for ExpressionError {}

impl From<ExpressionError> for CalcError {
    fn from(e: ExpressionError) -> Self {
        match e {
            ExpressionError::DivisionByZero => Self::DivisionByZero,
            other => Self::evaluation(other.to_string()),
        }
    }
}
