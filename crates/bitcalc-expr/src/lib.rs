//! Expression editing and evaluation for bitcalc.
//!
//! [`Expression`] is the input line a user builds key by key; [`evaluate`]
//! turns finished text into a wrapped [`CalculationResult`](bitcalc_core::CalculationResult).

mod edit;
mod error;
mod eval;
mod lexer;
mod token;

pub use edit::{EditOutcome, Expression, RejectReason};
pub use error::ExpressionError;
pub use eval::{evaluate, Evaluator, MAX_DEPTH};
pub use lexer::{lex, Lexeme};
pub use token::{BinaryOp, ShiftOp, Token, UnaryFn};
