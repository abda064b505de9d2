//! Splits expression text into numbers, operators and parentheses.

use crate::error::ExpressionError;
use crate::token::{BinaryOp, ShiftOp};
use bitcalc_core::BigInt;
use num_traits::Num;
use std::fmt;

/// One lexical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    /// Integer literal; any fractional part has been dropped
    Number(BigInt),
    Binary(BinaryOp),
    Shift(ShiftOp),
    Open,
    Close,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Binary(op) => write!(f, "{}", op.symbol()),
            Self::Shift(op) => f.write_str(op.symbol()),
            Self::Open => f.write_str("("),
            Self::Close => f.write_str(")"),
        }
    }
}

/// Tokenize `input`. Whitespace is skipped.
///
/// Numerals are `digits[.digits]`; the fraction is truncated since the
/// calculator only works on integers.
pub fn lex(input: &str) -> Result<Vec<Lexeme>, ExpressionError> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '0'..='9' | '.' => {
                let mut end = pos + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push(Lexeme::Number(parse_numeral(&input[pos..end])?));
            }
            '<' | '>' => match chars.next() {
                Some((_, second)) if second == c => out.push(Lexeme::Shift(if c == '<' {
                    ShiftOp::Left
                } else {
                    ShiftOp::Right
                })),
                _ => return Err(ExpressionError::UnexpectedChar { ch: c, position: pos }),
            },
            '(' => out.push(Lexeme::Open),
            ')' => out.push(Lexeme::Close),
            _ => match BinaryOp::from_char(c) {
                Some(op) => out.push(Lexeme::Binary(op)),
                None => return Err(ExpressionError::UnexpectedChar { ch: c, position: pos }),
            },
        }
    }

    Ok(out)
}

fn parse_numeral(text: &str) -> Result<BigInt, ExpressionError> {
    let invalid = || ExpressionError::InvalidNumber(text.to_string());
    let (int, frac) = text.split_once('.').unwrap_or((text, ""));
    if frac.contains('.') || (int.is_empty() && frac.is_empty()) {
        return Err(invalid());
    }
    if int.is_empty() {
        return Ok(BigInt::default());
    }
    BigInt::from_str_radix(int, 10).map_err(|_| invalid())
}
