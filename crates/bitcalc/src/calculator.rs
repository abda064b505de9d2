//! The calculator state machine.
//!
//! [`FixedWidthCalculator`] owns the expression line, the current mode and
//! what the result area shows. It is driven by [`CalcMessage`]s through the
//! [`State`] trait; a successful evaluation returns a
//! [`Command::Persist`] carrying the history record instead of storing it.

use crate::keymap::{event_to_messages, key_to_message};
use bitcalc_core::{CalculationResult, Command, Event, HistoryRecord, Key, Mode, State};
use bitcalc_expr::{evaluate, EditOutcome, Expression, Token};
use serde::{Deserialize, Serialize};

/// What the result area shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Nothing yet; the user is typing
    #[default]
    Editing,
    /// Last successful evaluation
    Result(CalculationResult),
    /// "Cannot divide by zero" or "Error"
    Message(String),
}

/// Input to the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcMessage {
    /// Offer a token to the expression
    Token(Token),
    /// `=`
    Evaluate,
    /// Backspace
    DeleteLast,
    /// Clear the expression and the screen
    Clear,
    /// Switch word size; clears everything
    SetMode(Mode),
    /// Raw key press, translated by the key map
    Key(Key),
    /// Input event; text becomes one message per recognised character
    Input(Event),
}

/// Programmer calculator over WORD, DWORD and QWORD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedWidthCalculator {
    expression: Expression,
    mode: Mode,
    screen: Screen,
    #[serde(skip)]
    last_edit: Option<EditOutcome>,
}

impl FixedWidthCalculator {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub const fn expression(&self) -> &Expression {
        &self.expression
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Displayed result, if the last evaluation succeeded.
    pub const fn result(&self) -> Option<&CalculationResult> {
        match &self.screen {
            Screen::Result(result) => Some(result),
            _ => None,
        }
    }

    /// Displayed error text, if the last evaluation failed.
    pub fn message(&self) -> Option<&str> {
        match &self.screen {
            Screen::Message(text) => Some(text),
            _ => None,
        }
    }

    /// Outcome of the most recent token offered.
    pub const fn last_edit(&self) -> Option<EditOutcome> {
        self.last_edit
    }

    fn append(&mut self, token: Token) {
        self.screen = Screen::Editing;
        self.last_edit = Some(self.expression.append(token, self.mode));
    }

    fn evaluate(&mut self) -> Command<CalcMessage> {
        match evaluate(self.expression.as_str(), self.mode) {
            Ok(None) => Command::None,
            Ok(Some(result)) => {
                let record = HistoryRecord::now(
                    self.expression.as_str(),
                    result.signed_decimal.clone(),
                    self.mode,
                );
                self.expression.clear();
                self.screen = Screen::Result(result);
                Command::Persist { record }
            }
            Err(err) => {
                self.screen = Screen::Message(err.display_text().to_string());
                Command::None
            }
        }
    }
}

impl State for FixedWidthCalculator {
    type Message = CalcMessage;

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
        match msg {
            CalcMessage::Token(token) => {
                self.append(token);
                Command::None
            }
            CalcMessage::Evaluate => self.evaluate(),
            CalcMessage::DeleteLast => {
                self.expression.delete_last();
                Command::None
            }
            CalcMessage::Clear => {
                self.expression.clear();
                self.screen = Screen::Editing;
                Command::None
            }
            CalcMessage::SetMode(mode) => {
                tracing::debug!(from = %self.mode, to = %mode, "mode changed");
                self.mode = mode;
                self.expression.clear();
                self.screen = Screen::Editing;
                Command::None
            }
            CalcMessage::Key(key) => key_to_message(key).map_or(Command::None, Command::Dispatch),
            CalcMessage::Input(event) => {
                Command::batch(event_to_messages(&event).into_iter().map(Command::Dispatch))
            }
        }
    }
}
