//! Calculator keys as expression tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Infix operators other than shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`, also written `−` (U+2212)
    Subtract,
    /// `×`, also written `*`
    Multiply,
    /// `÷`, also written `/`; truncating integer division
    Divide,
    /// `%`, remainder with the sign of the dividend
    Remainder,
}

impl BinaryOp {
    /// Character written into the expression buffer.
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
            Self::Remainder => '%',
        }
    }

    /// Operator for a display or ASCII character.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' | '\u{2212}' => Some(Self::Subtract),
            '×' | '*' => Some(Self::Multiply),
            '÷' | '/' => Some(Self::Divide),
            '%' => Some(Self::Remainder),
            _ => None,
        }
    }
}

/// Bit shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftOp {
    /// `<<`
    Left,
    /// `>>`, arithmetic
    Right,
}

impl ShiftOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Left => "<<",
            Self::Right => ">>",
        }
    }
}

/// Single-operand function keys (`1/x` and the like).
///
/// The programmer calculator has none that apply; the keys exist so a shared
/// keypad can send them and have them refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryFn {
    /// `1/x`
    Reciprocal,
}

/// One key's worth of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Decimal digit, 0-9
    Digit(u8),
    /// Decimal point
    Point,
    /// Infix operator
    Binary(BinaryOp),
    /// `<<` or `>>`
    Shift(ShiftOp),
    /// Parenthesis toggle: opens when none is open, closes otherwise
    Paren,
    /// Function key
    Unary(UnaryFn),
}

impl Token {
    /// Digit token, if `d` is a decimal digit.
    pub const fn digit(d: u8) -> Option<Self> {
        if d <= 9 {
            Some(Self::Digit(d))
        } else {
            None
        }
    }

    /// Token for a typed character.
    ///
    /// Both parentheses map to the toggle; `<` and `>` stand for whole shifts.
    pub fn from_char(c: char) -> Option<Self> {
        if let Some(d) = c.to_digit(10) {
            return Some(Self::Digit(d as u8));
        }
        match c {
            '.' => Some(Self::Point),
            '(' | ')' => Some(Self::Paren),
            '<' => Some(Self::Shift(ShiftOp::Left)),
            '>' => Some(Self::Shift(ShiftOp::Right)),
            _ => BinaryOp::from_char(c).map(Self::Binary),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{d}"),
            Self::Point => f.write_str("."),
            Self::Binary(op) => write!(f, "{}", op.symbol()),
            Self::Shift(op) => f.write_str(op.symbol()),
            Self::Paren => f.write_str("()"),
            Self::Unary(UnaryFn::Reciprocal) => f.write_str("1/x"),
        }
    }
}
