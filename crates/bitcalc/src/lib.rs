//! Bitcalc: a fixed-width programmer calculator.
//!
//! Expressions are typed key by key under one of three word sizes (WORD,
//! DWORD, QWORD), evaluated as integers, wrapped to the word in two's
//! complement and shown in signed decimal, hex, octal and binary.
//!
//! # Example
//!
//! ```
//! use bitcalc::{char_to_message, FixedWidthCalculator, InMemoryHistory, Mode, Store};
//!
//! let mut store = Store::new(FixedWidthCalculator::new(Mode::Word), InMemoryHistory::new());
//! for c in "32767+1=".chars() {
//!     if let Some(msg) = char_to_message(c) {
//!         store.dispatch(msg).expect("in-memory history never fails");
//!     }
//! }
//! let result = store.state().result().expect("evaluated");
//! assert_eq!(result.signed_decimal, "-32768");
//! assert_eq!(result.hex, "0x8000");
//! ```

mod calculator;
mod keymap;

pub use calculator::{CalcMessage, FixedWidthCalculator, Screen};
pub use keymap::{char_to_message, event_to_messages, key_to_message};

// Re-exports so front ends depend on one crate.
pub use bitcalc_core::{
    CalcError, CalculationResult, Command, Event, HistoryConfig, HistoryEntry, HistoryError,
    HistoryId, HistoryRecord, HistoryStore, InMemoryHistory, Key, Mode, ModeParseError, Radix,
    State, Store,
};
pub use bitcalc_expr::{
    evaluate, BinaryOp, EditOutcome, Expression, RejectReason, ShiftOp, Token, UnaryFn,
};
