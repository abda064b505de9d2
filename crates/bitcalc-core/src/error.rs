//! Error types for bitcalc-core.

use thiserror::Error;

/// Message shown when an expression divides by zero.
pub const DIVIDE_BY_ZERO_MESSAGE: &str = "Cannot divide by zero";

/// Message shown when an expression cannot be evaluated.
pub const EVALUATION_ERROR_MESSAGE: &str = "Error";

/// Evaluation failures, rendered as display text rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The expression divides by zero.
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// The expression is malformed. The detail is for logs, not for display.
    #[error("Error")]
    Evaluation {
        /// What went wrong
        detail: String,
    },
}

impl CalcError {
    pub fn evaluation(detail: impl Into<String>) -> Self {
        Self::Evaluation {
            detail: detail.into(),
        }
    }

    /// Text for the result display.
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::DivisionByZero => DIVIDE_BY_ZERO_MESSAGE,
            Self::Evaluation { .. } => EVALUATION_ERROR_MESSAGE,
        }
    }
}

/// Errors from a history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Entries could not be (de)serialized.
    #[error("history serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// The backing store rejected the operation.
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}
