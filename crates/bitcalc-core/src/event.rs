//! Keyboard input for the calculator.

use serde::{Deserialize, Serialize};

/// Input events a calculator front end forwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Key pressed
    KeyDown {
        /// Key
        key: Key,
    },
    /// Text typed or pasted
    TextInput {
        /// Text
        text: String,
    },
}

/// Keys the calculator responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    // Numbers
    /// 0 key
    Num0,
    /// 1 key
    Num1,
    /// 2 key
    Num2,
    /// 3 key
    Num3,
    /// 4 key
    Num4,
    /// 5 key
    Num5,
    /// 6 key
    Num6,
    /// 7 key
    Num7,
    /// 8 key
    Num8,
    /// 9 key
    Num9,

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `.`
    Period,
    /// `(`
    ParenLeft,
    /// `)`
    ParenRight,
    /// `<`
    Less,
    /// `>`
    Greater,

    // Control keys
    /// Enter/Return key
    Enter,
    /// `=`
    Equal,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Escape key
    Escape,
}

impl Key {
    /// Digit value for number keys.
    pub const fn digit(self) -> Option<u8> {
        match self {
            Self::Num0 => Some(0),
            Self::Num1 => Some(1),
            Self::Num2 => Some(2),
            Self::Num3 => Some(3),
            Self::Num4 => Some(4),
            Self::Num5 => Some(5),
            Self::Num6 => Some(6),
            Self::Num7 => Some(7),
            Self::Num8 => Some(8),
            Self::Num9 => Some(9),
            _ => None,
        }
    }

    /// Key producing `c`, if any.
    ///
    /// Display operators (`×`, `÷`, `−`) map to their ASCII keys.
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '0' => Self::Num0,
            '1' => Self::Num1,
            '2' => Self::Num2,
            '3' => Self::Num3,
            '4' => Self::Num4,
            '5' => Self::Num5,
            '6' => Self::Num6,
            '7' => Self::Num7,
            '8' => Self::Num8,
            '9' => Self::Num9,
            '+' => Self::Plus,
            '-' | '\u{2212}' => Self::Minus,
            '*' | '×' => Self::Asterisk,
            '/' | '÷' => Self::Slash,
            '%' => Self::Percent,
            '.' => Self::Period,
            '(' => Self::ParenLeft,
            ')' => Self::ParenRight,
            '<' => Self::Less,
            '>' => Self::Greater,
            '=' => Self::Equal,
            '\n' | '\r' => Self::Enter,
            '\u{8}' => Self::Backspace,
            '\u{7f}' => Self::Delete,
            '\u{1b}' => Self::Escape,
            _ => return None,
        })
    }
}
