//! Keyboard and text input mapped to calculator messages.

use crate::calculator::CalcMessage;
use bitcalc_core::{Event, Key};
use bitcalc_expr::{BinaryOp, ShiftOp, Token};

/// Message for a key press, if the key does anything.
pub fn key_to_message(key: Key) -> Option<CalcMessage> {
    if let Some(d) = key.digit() {
        return Some(CalcMessage::Token(Token::Digit(d)));
    }
    let msg = match key {
        Key::Plus => CalcMessage::Token(Token::Binary(BinaryOp::Add)),
        Key::Minus => CalcMessage::Token(Token::Binary(BinaryOp::Subtract)),
        Key::Asterisk => CalcMessage::Token(Token::Binary(BinaryOp::Multiply)),
        Key::Slash => CalcMessage::Token(Token::Binary(BinaryOp::Divide)),
        Key::Percent => CalcMessage::Token(Token::Binary(BinaryOp::Remainder)),
        Key::Period => CalcMessage::Token(Token::Point),
        Key::ParenLeft | Key::ParenRight => CalcMessage::Token(Token::Paren),
        Key::Less => CalcMessage::Token(Token::Shift(ShiftOp::Left)),
        Key::Greater => CalcMessage::Token(Token::Shift(ShiftOp::Right)),
        Key::Enter | Key::Equal => CalcMessage::Evaluate,
        Key::Backspace => CalcMessage::DeleteLast,
        Key::Delete | Key::Escape => CalcMessage::Clear,
        _ => return None,
    };
    Some(msg)
}

/// Message for a typed character.
pub fn char_to_message(c: char) -> Option<CalcMessage> {
    Key::from_char(c).and_then(key_to_message)
}

/// Messages for an input event, in order. Unmapped input is dropped.
pub fn event_to_messages(event: &Event) -> Vec<CalcMessage> {
    match event {
        Event::KeyDown { key } => key_to_message(*key).into_iter().collect(),
        Event::TextInput { text } => text.chars().filter_map(char_to_message).collect(),
    }
}
