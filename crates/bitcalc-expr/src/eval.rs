//! Integer expression evaluation.
//!
//! A recursive-descent parser that computes while it parses. Precedence,
//! tightest first:
//!
//! | level | operators | notes |
//! |-------|-----------|-------|
//! | unary | `-`       | |
//! | quotient | `÷`    | truncates toward zero |
//! | shift | `<<` `>>` | in 32-bit signed integers |
//! | product | `×` `%` | |
//! | sum   | `+` `-`   | |
//!
//! `÷` and the shifts bind tighter than `×`, so `2×7÷2` is `2×3`. All levels
//! are left associative. Parentheses nest at most [`MAX_DEPTH`] deep.

use crate::error::ExpressionError;
use crate::lexer::{lex, Lexeme};
use crate::token::{BinaryOp, ShiftOp};
use bitcalc_core::{wrap_signed, BigInt, CalcError, CalculationResult, Mode, SHIFT_WIDTH};
use num_traits::{ToPrimitive, Zero};
use regex::Regex;
use std::sync::OnceLock;

/// Deepest parenthesis nesting the parser descends into.
pub const MAX_DEPTH: usize = 32;

/// Evaluates expression text under a mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    mode: Mode,
}

impl Evaluator {
    /// Create an evaluator for `mode`.
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Compute the unwrapped integer value of `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is malformed or divides by zero.
    pub fn evaluate(&self, input: &str) -> Result<BigInt, ExpressionError> {
        let lexemes = lex(input)?;
        if lexemes.is_empty() {
            return Err(ExpressionError::EmptyExpression);
        }
        let mut parser = Parser {
            lexemes: &lexemes,
            pos: 0,
            depth: 0,
        };
        let value = parser.sum()?;
        match parser.peek() {
            None => Ok(value),
            Some(Lexeme::Close) => Err(ExpressionError::UnbalancedParen),
            Some(other) => Err(ExpressionError::UnexpectedToken(other.to_string())),
        }
    }
}

struct Parser<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Lexeme> {
        let lexeme = self.lexemes.get(self.pos);
        self.pos += 1;
        lexeme
    }

    fn peek_binary(&self, ops: &[BinaryOp]) -> Option<BinaryOp> {
        match self.peek() {
            Some(Lexeme::Binary(op)) if ops.contains(op) => Some(*op),
            _ => None,
        }
    }

    fn sum(&mut self) -> Result<BigInt, ExpressionError> {
        let mut acc = self.product()?;
        while let Some(op) = self.peek_binary(&[BinaryOp::Add, BinaryOp::Subtract]) {
            self.pos += 1;
            let rhs = self.product()?;
            acc = if op == BinaryOp::Add { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    fn product(&mut self) -> Result<BigInt, ExpressionError> {
        let mut acc = self.shift()?;
        while let Some(op) = self.peek_binary(&[BinaryOp::Multiply, BinaryOp::Remainder]) {
            self.pos += 1;
            let rhs = self.shift()?;
            acc = if op == BinaryOp::Multiply {
                acc * rhs
            } else {
                if rhs.is_zero() {
                    return Err(ExpressionError::DivisionByZero);
                }
                acc % rhs
            };
        }
        Ok(acc)
    }

    fn shift(&mut self) -> Result<BigInt, ExpressionError> {
        let mut acc = self.quotient()?;
        while let Some(Lexeme::Shift(op)) = self.peek() {
            let op = *op;
            self.pos += 1;
            let amount = self.quotient()?;
            acc = shift(&acc, op, &amount, SHIFT_WIDTH);
        }
        Ok(acc)
    }

    fn quotient(&mut self) -> Result<BigInt, ExpressionError> {
        let mut acc = self.unary()?;
        while self.peek_binary(&[BinaryOp::Divide]).is_some() {
            self.pos += 1;
            let rhs = self.unary()?;
            if rhs.is_zero() {
                return Err(ExpressionError::DivisionByZero);
            }
            // BigInt division truncates toward zero.
            acc /= rhs;
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<BigInt, ExpressionError> {
        let mut negate = false;
        while self.peek_binary(&[BinaryOp::Subtract]).is_some() {
            self.pos += 1;
            negate = !negate;
        }
        let value = self.primary()?;
        Ok(if negate { -value } else { value })
    }

    fn primary(&mut self) -> Result<BigInt, ExpressionError> {
        match self.advance() {
            Some(Lexeme::Number(n)) => Ok(n.clone()),
            Some(Lexeme::Open) => {
                if self.depth == MAX_DEPTH {
                    return Err(ExpressionError::TooDeep);
                }
                self.depth += 1;
                let value = self.sum()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Lexeme::Close) => Ok(value),
                    None => Err(ExpressionError::UnbalancedParen),
                    Some(other) => Err(ExpressionError::UnexpectedToken(other.to_string())),
                }
            }
            Some(Lexeme::Close) => Err(ExpressionError::UnbalancedParen),
            Some(other) => Err(ExpressionError::UnexpectedToken(other.to_string())),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }
}

/// Shift `value` by `amount` in a `width`-bit signed integer.
///
/// The operand is first reduced to `width` bits, the amount is masked to
/// `width - 1`, and the result is reduced again.
fn shift(value: &BigInt, op: ShiftOp, amount: &BigInt, width: u32) -> BigInt {
    let lhs = wrap_signed(value, width);
    let width_big = BigInt::from(width);
    let masked = ((amount % &width_big) + &width_big) % &width_big;
    let bits = masked.to_u32().unwrap_or(0);
    let shifted = match op {
        ShiftOp::Left => lhs << bits,
        ShiftOp::Right => lhs >> bits,
    };
    wrap_signed(&shifted, width)
}

fn trailing_zero_divisor() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[÷/]\s*0+(?:\.0*)?\s*$").expect("divide-by-zero pattern is valid")
    })
}

fn ends_with_operator(text: &str) -> bool {
    text.trim_end()
        .chars()
        .last()
        .is_some_and(|c| matches!(c, '(' | '<' | '>') || BinaryOp::from_char(c).is_some())
}

fn has_operator(text: &str) -> bool {
    text.contains("<<")
        || text.contains(">>")
        || text.chars().any(|c| BinaryOp::from_char(c).is_some())
}

/// Evaluate expression text under `mode` and render the wrapped result.
///
/// Returns `Ok(None)` when there is nothing to evaluate yet: no operator at
/// all, or a trailing operator or open parenthesis. A trailing division by a
/// zero literal is refused before parsing.
///
/// # Errors
///
/// [`CalcError::DivisionByZero`] for any division or remainder by zero,
/// [`CalcError::Evaluation`] for malformed input.
pub fn evaluate(text: &str, mode: Mode) -> Result<Option<CalculationResult>, CalcError> {
    if trailing_zero_divisor().is_match(text) {
        tracing::debug!(expression = text, "division by zero literal");
        return Err(CalcError::DivisionByZero);
    }
    if !has_operator(text) || ends_with_operator(text) {
        return Ok(None);
    }

    let raw = Evaluator::new(mode).evaluate(text).map_err(|e| {
        tracing::warn!(expression = text, error = %e, "evaluation failed");
        CalcError::from(e)
    })?;
    let result = CalculationResult::from_raw(&raw, mode);
    tracing::debug!(expression = text, %mode, result = %result.signed_decimal, "evaluated");
    Ok(Some(result))
}
