//! The editable expression line.
//!
//! Input arrives one key at a time. Each key is checked against the current
//! text and either appended or refused; a refused key leaves the text
//! untouched and is reported as an [`EditOutcome::Rejected`] value, not as an
//! error. Refusals are part of normal typing.
//!
//! Parentheses use a single toggle key, so at most one group can be open.

use crate::error::ExpressionError;
use crate::token::{BinaryOp, Token};
use bitcalc_core::{BigInt, Mode};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a key was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Digit directly after `)`
    DigitAfterCloseParen,
    /// Operator or shift directly after `(`
    OperatorAfterOpenParen,
    /// Digit typed onto a bare `0`
    LeadingZero,
    /// `%` directly after `%`
    RepeatedPercent,
    /// Function key directly after an operator
    UnaryAfterOperator,
    /// Function key that this calculator does not support
    UnsupportedInMode,
    /// Operator other than `-` on an empty line
    LeadingOperator,
    /// Operator directly after another operator
    ConsecutiveOperators,
    /// Shift that does not follow a number
    ShiftWithoutOperand,
    /// Operand would leave the mode's signed range
    Overflow,
    /// Point with no digit before it, a second point, or a point in a shift amount
    MisplacedPoint,
    /// `(` after an operand, or `)` after an operator
    MisplacedParen,
    /// Digit value above 9
    InvalidDigit,
}

/// Result of offering a token to an [`Expression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Token appended
    Accepted,
    /// Token refused, text unchanged
    Rejected(RejectReason),
}

impl EditOutcome {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub const fn reason(self) -> Option<RejectReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Shape of the last thing typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    Empty,
    Digit,
    Point,
    Binary(BinaryOp),
    Shift,
    Open,
    Close,
}

fn is_separator(c: char) -> bool {
    matches!(c, '(' | ')' | '<' | '>') || BinaryOp::from_char(c).is_some()
}

/// Expression text under construction.
///
/// Deserialized text is replayed key by key, so a stored line is only
/// accepted if typing could have produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Expression {
    text: String,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether a parenthesis group is open.
    pub fn paren_open(&self) -> bool {
        let opens = self.text.matches('(').count();
        let closes = self.text.matches(')').count();
        opens > closes
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Remove the last token. Shifts go as a unit.
    pub fn delete_last(&mut self) {
        if self.text.ends_with("<<") || self.text.ends_with(">>") {
            self.text.truncate(self.text.len() - 2);
        } else {
            self.text.pop();
        }
    }

    /// Offer a token. On rejection the text is unchanged.
    pub fn append(&mut self, token: Token, mode: Mode) -> EditOutcome {
        match self.check(token, mode) {
            Ok(()) => {
                self.push(token);
                EditOutcome::Accepted
            }
            Err(reason) => {
                tracing::trace!(expression = %self.text, %token, ?reason, "token rejected");
                EditOutcome::Rejected(reason)
            }
        }
    }

    /// Offer a typed character. Unknown characters are ignored.
    pub fn append_char(&mut self, c: char, mode: Mode) -> Option<EditOutcome> {
        Token::from_char(c).map(|token| self.append(token, mode))
    }

    fn push(&mut self, token: Token) {
        match token {
            Token::Digit(d) => self.text.push(char::from(b'0' + d)),
            Token::Point => self.text.push('.'),
            Token::Binary(op) => self.text.push(op.symbol()),
            Token::Shift(op) => self.text.push_str(op.symbol()),
            Token::Paren => {
                let paren = if self.paren_open() { ')' } else { '(' };
                self.text.push(paren);
            }
            Token::Unary(_) => {}
        }
    }

    fn tail(&self) -> Tail {
        match self.text.chars().last() {
            None => Tail::Empty,
            Some(c) if c.is_ascii_digit() => Tail::Digit,
            Some('.') => Tail::Point,
            Some('(') => Tail::Open,
            Some(')') => Tail::Close,
            Some('<' | '>') => Tail::Shift,
            Some(c) => BinaryOp::from_char(c).map_or(Tail::Empty, Tail::Binary),
        }
    }

    /// Byte offset where the operand being typed starts.
    fn operand_start(&self) -> usize {
        self.text
            .char_indices()
            .rev()
            .find(|(_, c)| is_separator(*c))
            .map_or(0, |(i, c)| i + c.len_utf8())
    }

    /// The operand being typed, possibly empty.
    fn operand(&self) -> &str {
        &self.text[self.operand_start()..]
    }

    /// Whether the operand being typed is a shift amount.
    fn operand_is_shift_amount(&self) -> bool {
        let start = self.operand_start();
        matches!(self.text[..start].chars().last(), Some('<' | '>'))
    }

    /// Whether the operand being typed carries the line's leading minus.
    fn operand_is_negated(&self) -> bool {
        self.operand_start() == 1 && self.text.starts_with('-')
    }

    fn check(&self, token: Token, mode: Mode) -> Result<(), RejectReason> {
        let tail = self.tail();
        match token {
            Token::Digit(d) => self.check_digit(d, tail, mode),
            Token::Point => {
                if tail != Tail::Digit
                    || self.operand().contains('.')
                    || self.operand_is_shift_amount()
                {
                    return Err(RejectReason::MisplacedPoint);
                }
                Ok(())
            }
            Token::Binary(op) => match tail {
                Tail::Empty if op == BinaryOp::Subtract => Ok(()),
                Tail::Empty => Err(RejectReason::LeadingOperator),
                Tail::Open => Err(RejectReason::OperatorAfterOpenParen),
                Tail::Binary(BinaryOp::Remainder) if op == BinaryOp::Remainder => {
                    Err(RejectReason::RepeatedPercent)
                }
                Tail::Binary(_) | Tail::Shift => Err(RejectReason::ConsecutiveOperators),
                Tail::Digit | Tail::Point | Tail::Close => Ok(()),
            },
            Token::Shift(_) => match tail {
                Tail::Open => Err(RejectReason::OperatorAfterOpenParen),
                Tail::Binary(_) | Tail::Shift => Err(RejectReason::ConsecutiveOperators),
                Tail::Digit => Ok(()),
                Tail::Empty | Tail::Point | Tail::Close => Err(RejectReason::ShiftWithoutOperand),
            },
            Token::Paren => {
                let allowed = if self.paren_open() {
                    tail == Tail::Digit
                } else {
                    matches!(tail, Tail::Empty | Tail::Binary(_) | Tail::Shift)
                };
                if allowed {
                    Ok(())
                } else {
                    Err(RejectReason::MisplacedParen)
                }
            }
            Token::Unary(_) => match tail {
                Tail::Binary(_) | Tail::Shift => Err(RejectReason::UnaryAfterOperator),
                _ => Err(RejectReason::UnsupportedInMode),
            },
        }
    }

    fn check_digit(&self, d: u8, tail: Tail, mode: Mode) -> Result<(), RejectReason> {
        if d > 9 {
            return Err(RejectReason::InvalidDigit);
        }
        if tail == Tail::Close {
            return Err(RejectReason::DigitAfterCloseParen);
        }

        let operand = self.operand();
        if operand == "0" {
            return Err(RejectReason::LeadingZero);
        }

        // Digits after a point leave the integer part alone.
        if operand.contains('.') {
            return Ok(());
        }

        let mut value = operand
            .chars()
            .filter_map(|c| c.to_digit(10))
            .chain(std::iter::once(u32::from(d)))
            .fold(BigInt::zero(), |acc, digit| acc * 10 + digit);
        if self.operand_is_negated() {
            value = -value;
        }
        if mode.contains(&value) {
            Ok(())
        } else {
            Err(RejectReason::Overflow)
        }
    }
}

impl TryFrom<String> for Expression {
    type Error = ExpressionError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        let invalid = || ExpressionError::InvalidText(text.clone());
        let mut expr = Self::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            // Shifts are stored doubled but typed once.
            if matches!(c, '<' | '>') && chars.next() != Some(c) {
                return Err(invalid());
            }
            let token = Token::from_char(c).ok_or_else(invalid)?;
            if !expr.append(token, Mode::Qword).is_accepted() {
                return Err(invalid());
            }
        }
        if expr.text == text {
            Ok(expr)
        } else {
            Err(invalid())
        }
    }
}

impl From<Expression> for String {
    fn from(expr: Expression) -> Self {
        expr.text
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ShiftOp, UnaryFn};
    use proptest::prelude::*;

    const PLUS: Token = Token::Binary(BinaryOp::Add);
    const MINUS: Token = Token::Binary(BinaryOp::Subtract);
    const TIMES: Token = Token::Binary(BinaryOp::Multiply);
    const DIVIDE: Token = Token::Binary(BinaryOp::Divide);
    const PERCENT: Token = Token::Binary(BinaryOp::Remainder);
    const SHL: Token = Token::Shift(ShiftOp::Left);
    const SHR: Token = Token::Shift(ShiftOp::Right);

    fn typed(keys: &str, mode: Mode) -> Expression {
        let mut expr = Expression::new();
        for c in keys.chars() {
            expr.append_char(c, mode);
        }
        expr
    }

    fn offer(keys: &str, token: Token) -> (Expression, EditOutcome) {
        let mut expr = typed(keys, Mode::Word);
        let before = expr.clone();
        let outcome = expr.append(token, Mode::Word);
        if !outcome.is_accepted() {
            assert_eq!(expr, before, "rejected token must not change the text");
        }
        (expr, outcome)
    }

    #[test]
    fn test_digits_append() {
        let expr = typed("123", Mode::Word);
        assert_eq!(expr.as_str(), "123");
    }

    #[test]
    fn test_rule_digit_after_close_paren() {
        let (expr, outcome) = offer("(1+2)", Token::Digit(3));
        assert_eq!(outcome.reason(), Some(RejectReason::DigitAfterCloseParen));
        assert_eq!(expr.as_str(), "(1+2)");
    }

    #[test]
    fn test_rule_operator_after_open_paren() {
        assert_eq!(
            offer("2×(", PLUS).1.reason(),
            Some(RejectReason::OperatorAfterOpenParen)
        );
        assert_eq!(
            offer("(", SHL).1.reason(),
            Some(RejectReason::OperatorAfterOpenParen)
        );
    }

    #[test]
    fn test_rule_leading_zero() {
        assert_eq!(offer("0", Token::Digit(5)).1.reason(), Some(RejectReason::LeadingZero));
        assert_eq!(offer("7+0", Token::Digit(0)).1.reason(), Some(RejectReason::LeadingZero));
        assert_eq!(offer("-0", Token::Digit(1)).1.reason(), Some(RejectReason::LeadingZero));
    }

    #[test]
    fn test_rule_leading_zero_allows_point() {
        let (expr, outcome) = offer("0.", Token::Digit(5));
        assert!(outcome.is_accepted());
        assert_eq!(expr.as_str(), "0.5");
        assert!(offer("10", Token::Digit(0)).1.is_accepted());
    }

    #[test]
    fn test_rule_repeated_percent() {
        assert_eq!(offer("5%", PERCENT).1.reason(), Some(RejectReason::RepeatedPercent));
    }

    #[test]
    fn test_rule_unary_after_operator() {
        let reciprocal = Token::Unary(UnaryFn::Reciprocal);
        assert_eq!(
            offer("5+", reciprocal).1.reason(),
            Some(RejectReason::UnaryAfterOperator)
        );
        assert_eq!(
            offer("5", reciprocal).1.reason(),
            Some(RejectReason::UnsupportedInMode)
        );
    }

    #[test]
    fn test_rule_leading_operator() {
        for token in [PLUS, TIMES, DIVIDE, PERCENT] {
            assert_eq!(offer("", token).1.reason(), Some(RejectReason::LeadingOperator));
        }
        let (expr, outcome) = offer("", MINUS);
        assert!(outcome.is_accepted());
        assert_eq!(expr.as_str(), "-");
    }

    #[test]
    fn test_rule_consecutive_operators() {
        assert_eq!(offer("5+", TIMES).1.reason(), Some(RejectReason::ConsecutiveOperators));
        assert_eq!(offer("5<<", MINUS).1.reason(), Some(RejectReason::ConsecutiveOperators));
        assert_eq!(offer("5÷", SHR).1.reason(), Some(RejectReason::ConsecutiveOperators));
        assert_eq!(offer("-", MINUS).1.reason(), Some(RejectReason::ConsecutiveOperators));
    }

    #[test]
    fn test_rule_shift_composition() {
        let mut expr = typed("5", Mode::Word);
        assert!(expr.append(SHL, Mode::Word).is_accepted());
        assert!(expr.append(Token::Digit(1), Mode::Word).is_accepted());
        assert!(expr.append(Token::Digit(2), Mode::Word).is_accepted());
        assert_eq!(expr.as_str(), "5<<12");
        assert!(expr.operand_is_shift_amount());
        assert_eq!(expr.operand(), "12");
    }

    #[test]
    fn test_rule_shift_needs_number() {
        assert_eq!(offer("", SHL).1.reason(), Some(RejectReason::ShiftWithoutOperand));
        assert_eq!(offer("(1+2)", SHL).1.reason(), Some(RejectReason::ShiftWithoutOperand));
        assert_eq!(offer("5.", SHR).1.reason(), Some(RejectReason::ShiftWithoutOperand));
    }

    #[test]
    fn test_rule_overflow_word() {
        let (expr, outcome) = offer("32767", Token::Digit(8));
        assert_eq!(outcome.reason(), Some(RejectReason::Overflow));
        assert_eq!(expr.as_str(), "32767");
        assert_eq!(offer("3276", Token::Digit(8)).1.reason(), Some(RejectReason::Overflow));
        assert!(offer("3276", Token::Digit(7)).1.is_accepted());
    }

    #[test]
    fn test_rule_overflow_uses_leading_minus() {
        assert!(offer("-3276", Token::Digit(8)).1.is_accepted());
        assert_eq!(offer("-3276", Token::Digit(9)).1.reason(), Some(RejectReason::Overflow));
    }

    #[test]
    fn test_rule_overflow_checks_trailing_operand_only() {
        assert!(offer("32767+3276", Token::Digit(7)).1.is_accepted());
        // A minus between operands is subtraction, not a sign.
        assert_eq!(
            offer("1-3276", Token::Digit(8)).1.reason(),
            Some(RejectReason::Overflow)
        );
    }

    #[test]
    fn test_rule_overflow_qword_bounds() {
        let mut expr = typed("922337203685477580", Mode::Qword);
        assert_eq!(
            expr.append(Token::Digit(8), Mode::Qword).reason(),
            Some(RejectReason::Overflow)
        );
        assert!(expr.append(Token::Digit(7), Mode::Qword).is_accepted());
        assert_eq!(expr.as_str(), "9223372036854775807");

        let mut neg = typed("-922337203685477580", Mode::Qword);
        assert!(neg.append(Token::Digit(8), Mode::Qword).is_accepted());
    }

    #[test]
    fn test_rule_overflow_dword() {
        let mut expr = typed("214748364", Mode::Dword);
        assert_eq!(
            expr.append(Token::Digit(8), Mode::Dword).reason(),
            Some(RejectReason::Overflow)
        );
    }

    #[test]
    fn test_fraction_digits_skip_range_check() {
        let (expr, outcome) = offer("32767.", Token::Digit(9));
        assert!(outcome.is_accepted());
        assert_eq!(expr.as_str(), "32767.9");
    }

    #[test]
    fn test_point_rules() {
        assert_eq!(offer("", Token::Point).1.reason(), Some(RejectReason::MisplacedPoint));
        assert_eq!(offer("1.5", Token::Point).1.reason(), Some(RejectReason::MisplacedPoint));
        assert_eq!(offer("5+", Token::Point).1.reason(), Some(RejectReason::MisplacedPoint));
        assert_eq!(offer("5<<2", Token::Point).1.reason(), Some(RejectReason::MisplacedPoint));
        assert!(offer("1.5+2", Token::Point).1.is_accepted());
    }

    #[test]
    fn test_paren_toggle() {
        let mut expr = typed("2×", Mode::Word);
        assert!(expr.append(Token::Paren, Mode::Word).is_accepted());
        assert!(expr.paren_open());
        for c in "3+4".chars() {
            expr.append_char(c, Mode::Word);
        }
        assert!(expr.append(Token::Paren, Mode::Word).is_accepted());
        assert_eq!(expr.as_str(), "2×(3+4)");
        assert!(!expr.paren_open());
    }

    #[test]
    fn test_paren_placement() {
        assert_eq!(offer("5", Token::Paren).1.reason(), Some(RejectReason::MisplacedParen));
        assert_eq!(offer("(5+", Token::Paren).1.reason(), Some(RejectReason::MisplacedParen));
        assert_eq!(offer("(", Token::Paren).1.reason(), Some(RejectReason::MisplacedParen));
        assert!(offer("", Token::Paren).1.is_accepted());
        assert!(offer("-", Token::Paren).1.is_accepted());
    }

    #[test]
    fn test_invalid_digit() {
        assert_eq!(offer("", Token::Digit(12)).1.reason(), Some(RejectReason::InvalidDigit));
    }

    #[test]
    fn test_delete_last() {
        let mut expr = typed("12+3", Mode::Word);
        expr.delete_last();
        assert_eq!(expr.as_str(), "12+");
        expr.delete_last();
        assert_eq!(expr.as_str(), "12");
    }

    #[test]
    fn test_delete_last_removes_whole_shift() {
        let mut expr = typed("5<<", Mode::Word);
        expr.delete_last();
        assert_eq!(expr.as_str(), "5");
    }

    #[test]
    fn test_delete_last_multibyte_operator() {
        let mut expr = typed("6÷", Mode::Word);
        expr.delete_last();
        assert_eq!(expr.as_str(), "6");
    }

    #[test]
    fn test_delete_last_keeps_paren_state() {
        let mut expr = typed("(1+2)", Mode::Word);
        assert!(!expr.paren_open());
        expr.delete_last();
        assert!(expr.paren_open());
    }

    #[test]
    fn test_delete_last_on_empty() {
        let mut expr = Expression::new();
        expr.delete_last();
        assert!(expr.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut expr = typed("1+2", Mode::Word);
        expr.clear();
        assert!(expr.is_empty());
    }

    #[test]
    fn test_unicode_minus_is_stored_as_hyphen() {
        let expr = typed("5\u{2212}3", Mode::Word);
        assert_eq!(expr.as_str(), "5-3");
    }

    fn restore(text: &str) -> Result<Expression, serde_json::Error> {
        serde_json::from_str(&serde_json::to_string(text).unwrap())
    }

    #[test]
    fn test_serializes_as_plain_text() {
        let expr = typed("12+3<<2", Mode::Word);
        assert_eq!(serde_json::to_string(&expr).unwrap(), "\"12+3<<2\"");
    }

    #[test]
    fn test_restore_accepts_typed_text() {
        for text in ["", "-", "5<<3", "2×(3+4)", "7÷0", "1.5%3", "32767+1", "(8>>1"] {
            assert_eq!(restore(text).unwrap().as_str(), text);
        }
    }

    #[test]
    fn test_restore_rejects_untypeable_text() {
        for text in ["1 ", "+1", "5<3", "5<>3", "1*2", "1\u{2212}2", "00", "((1", "1)", "12a"] {
            let err = restore(text).unwrap_err();
            assert!(err.to_string().contains("not a valid expression line"), "{text}: {err}");
        }
    }

    #[test]
    fn test_try_from_reports_text() {
        assert_eq!(
            Expression::try_from("1 ".to_string()),
            Err(ExpressionError::InvalidText("1 ".to_string()))
        );
    }

    #[test]
    fn test_typing_after_restore() {
        let mut expr = restore("12+3276").unwrap();
        assert_eq!(
            expr.append(Token::Digit(8), Mode::Word).reason(),
            Some(RejectReason::Overflow)
        );
        assert!(expr.append(Token::Digit(7), Mode::Word).is_accepted());
        assert_eq!(expr.as_str(), "12+32767");
    }

    fn any_token() -> impl Strategy<Value = Token> {
        prop_oneof![
            (0u8..10).prop_map(Token::Digit),
            Just(Token::Point),
            Just(PLUS),
            Just(MINUS),
            Just(TIMES),
            Just(DIVIDE),
            Just(PERCENT),
            Just(SHL),
            Just(SHR),
            Just(Token::Paren),
            Just(Token::Unary(UnaryFn::Reciprocal)),
        ]
    }

    proptest! {
        #[test]
        fn prop_rejection_leaves_text_unchanged(tokens in prop::collection::vec(any_token(), 0..40)) {
            let mut expr = Expression::new();
            for token in tokens {
                let before = expr.clone();
                if !expr.append(token, Mode::Word).is_accepted() {
                    prop_assert_eq!(&expr, &before);
                }
            }
        }

        #[test]
        fn prop_invariants_hold(tokens in prop::collection::vec(any_token(), 0..40)) {
            let mut expr = Expression::new();
            for token in tokens {
                expr.append(token, Mode::Word);
            }
            let text = expr.as_str();
            let first = text.chars().next();
            prop_assert!(!matches!(first, Some('+' | '×' | '÷' | '%' | '<' | '>')));
            let ops: Vec<bool> = text.chars().map(|c| BinaryOp::from_char(c).is_some()).collect();
            prop_assert!(!ops.windows(2).any(|w| w[0] && w[1]));
            prop_assert!(text.matches('(').count() <= text.matches(')').count() + 1);
        }
    }
}
