//! Core types for the bitcalc fixed-width calculator.
//!
//! This crate provides the foundational pieces the expression engine and the
//! calculator state machine build on:
//! - Word sizes and two's-complement wraparound: [`Mode`]
//! - Result rendering: [`CalculationResult`], [`Radix`]
//! - Elm-style state management: [`State`], [`Command`], [`Store`]
//! - History records and the persistence seam: [`HistoryStore`]
//! - Keyboard input: [`Event`], [`Key`]

mod error;
mod event;
pub mod history;
mod mode;
mod radix;
mod state;

pub use error::{CalcError, HistoryError, DIVIDE_BY_ZERO_MESSAGE, EVALUATION_ERROR_MESSAGE};
pub use event::{Event, Key};
pub use history::{
    HistoryConfig, HistoryEntry, HistoryId, HistoryRecord, HistoryStore, InMemoryHistory,
};
pub use mode::{wrap_signed, Mode, ModeParseError, Wrapped, SHIFT_WIDTH};
pub use radix::{format_grouped, CalculationResult, Radix};
pub use state::{Command, State, Store};

pub use num_bigint::BigInt;
