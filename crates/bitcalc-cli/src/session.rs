//! A calculator plus its history, as the CLI drives it.

use crate::config::{Config, ConfigError};
use bitcalc::{
    char_to_message, CalcMessage, EditOutcome, Event, FixedWidthCalculator, HistoryEntry,
    HistoryError, HistoryId, HistoryStore, InMemoryHistory, Mode, Screen, Store,
};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One key and what it did to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Keystroke {
    pub(crate) key: char,
    /// `None` for keys that are not tokens (`=`, backspace, ...)
    pub(crate) outcome: Option<EditOutcome>,
    pub(crate) buffer: String,
}

pub(crate) struct Session {
    store: Store<FixedWidthCalculator, InMemoryHistory>,
    history_file: Option<PathBuf>,
}

impl Session {
    /// Start a session; history is loaded from the configured file if it exists.
    pub(crate) fn open(config: &Config, mode: Mode) -> Result<Self, SessionError> {
        let history = match &config.history_file {
            Some(path) if path.exists() => {
                let json = read(path)?;
                InMemoryHistory::from_json(&json, config.history_config())?
            }
            _ => InMemoryHistory::with_config(config.history_config()),
        };
        tracing::debug!(%mode, entries = history.len(), "session opened");
        let mut store = Store::new(FixedWidthCalculator::new(mode), history);
        store.subscribe(|calc: &FixedWidthCalculator| {
            tracing::trace!(
                expression = %calc.expression(),
                mode = %calc.mode(),
                "calculator updated"
            );
        });
        Ok(Self {
            store,
            history_file: config.history_file.clone(),
        })
    }

    pub(crate) const fn calculator(&self) -> &FixedWidthCalculator {
        self.store.state()
    }

    /// Feed one typed character. Characters with no key are skipped.
    pub(crate) fn press(&mut self, key: char) -> Result<Option<Keystroke>, SessionError> {
        let Some(msg) = char_to_message(key) else {
            if !key.is_whitespace() {
                tracing::debug!(%key, "no key for character");
            }
            return Ok(None);
        };
        let is_token = matches!(msg, CalcMessage::Token(_));
        self.dispatch(msg)?;

        let outcome = if is_token {
            self.calculator().last_edit()
        } else {
            None
        };
        if let Some(EditOutcome::Rejected(reason)) = outcome {
            tracing::debug!(%key, ?reason, "key rejected");
        }
        Ok(Some(Keystroke {
            key,
            outcome,
            buffer: self.calculator().expression().to_string(),
        }))
    }

    /// Feed every character of `text`.
    pub(crate) fn type_text(&mut self, text: &str) -> Result<Vec<Keystroke>, SessionError> {
        let mut strokes = Vec::new();
        for key in text.chars() {
            strokes.extend(self.press(key)?);
        }
        Ok(strokes)
    }

    /// Send `text` as one input event.
    pub(crate) fn input(&mut self, text: &str) -> Result<(), SessionError> {
        self.dispatch(CalcMessage::Input(Event::TextInput {
            text: text.to_string(),
        }))
    }

    /// Evaluate the current line.
    pub(crate) fn evaluate(&mut self) -> Result<&Screen, SessionError> {
        self.dispatch(CalcMessage::Evaluate)?;
        Ok(self.calculator().screen())
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) -> Result<(), SessionError> {
        self.dispatch(CalcMessage::SetMode(mode))
    }

    /// Clear the line and the screen.
    pub(crate) fn reset(&mut self) -> Result<(), SessionError> {
        self.dispatch(CalcMessage::Clear)
    }

    /// History, newest first, optionally limited to one UTC day.
    pub(crate) fn history(&self, date: Option<NaiveDate>) -> Vec<HistoryEntry> {
        let history = self.store.history();
        match date {
            Some(date) => history.list_by_date(date),
            None => history.list(),
        }
    }

    /// Delete every history entry. Returns how many were removed.
    pub(crate) fn clear_history(&mut self) -> Result<usize, SessionError> {
        let ids: Vec<HistoryId> = self.store.history().list().into_iter().map(|e| e.id).collect();
        let removed = self.store.history_mut().delete(&ids)?;
        self.save()?;
        Ok(removed)
    }

    fn dispatch(&mut self, msg: CalcMessage) -> Result<(), SessionError> {
        let created = self.store.dispatch(msg)?;
        if !created.is_empty() {
            self.save()?;
        }
        Ok(())
    }

    /// Write history to the configured file, if any.
    pub(crate) fn save(&self) -> Result<(), SessionError> {
        let Some(path) = &self.history_file else {
            return Ok(());
        };
        let json = self.store.history().to_json()?;
        std::fs::write(path, json).map_err(|source| SessionError::Io {
            path: path.clone(),
            source,
        })
    }
}

fn read(path: &Path) -> Result<String, SessionError> {
    std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    })
}
