// Calculation history - records emitted by the calculator and the store
// that keeps them.
//
// Provides:
// - HistoryRecord: what a successful evaluation emits
// - HistoryEntry: a stored record with its id
// - HistoryStore: the persistence seam (create / list by date / delete by ids)
// - InMemoryHistory: bounded reference store with JSON import/export

use crate::error::HistoryError;
use crate::mode::Mode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a stored history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(Uuid);

impl HistoryId {
    /// Fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HistoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Data a successful evaluation hands to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Expression text as typed
    pub formula: String,
    /// Signed decimal result
    pub result: String,
    pub mode: Mode,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    /// Record stamped with the current time.
    pub fn now(formula: impl Into<String>, result: impl Into<String>, mode: Mode) -> Self {
        Self {
            formula: formula.into(),
            result: result.into(),
            mode,
            timestamp: Utc::now(),
        }
    }
}

/// A record as kept by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    #[serde(flatten)]
    pub record: HistoryRecord,
}

/// Persistence seam for calculation history.
///
/// The calculator never calls this directly; it emits
/// [`Command::Persist`](crate::Command::Persist) and the host's runtime
/// forwards the record here.
pub trait HistoryStore {
    /// Store a record under a fresh id.
    fn create(&mut self, record: HistoryRecord) -> Result<HistoryEntry, HistoryError>;

    /// All entries, newest first.
    fn list(&self) -> Vec<HistoryEntry>;

    /// Entries whose UTC timestamp falls on `date`, newest first.
    fn list_by_date(&self, date: NaiveDate) -> Vec<HistoryEntry> {
        self.list()
            .into_iter()
            .filter(|e| e.record.timestamp.date_naive() == date)
            .collect()
    }

    /// Remove the named entries. Unknown ids are ignored.
    ///
    /// Returns how many entries were removed.
    fn delete(&mut self, ids: &[HistoryId]) -> Result<usize, HistoryError>;
}

/// Configuration for [`InMemoryHistory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of entries kept, 0 for unbounded
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 100 }
    }
}

/// History kept in memory, oldest first
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    config: HistoryConfig,
    entries: Vec<HistoryEntry>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize all entries, oldest first.
    pub fn to_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Load entries previously written by [`to_json`](Self::to_json).
    ///
    /// The configured limit applies; the oldest surplus entries are dropped.
    pub fn from_json(json: &str, config: HistoryConfig) -> Result<Self, HistoryError> {
        let entries: Vec<HistoryEntry> = serde_json::from_str(json)?;
        let mut history = Self { config, entries };
        history.trim();
        Ok(history)
    }

    fn trim(&mut self) {
        let max = self.config.max_entries;
        if max > 0 && self.entries.len() > max {
            let excess = self.entries.len() - max;
            self.entries.drain(..excess);
            tracing::debug!(dropped = excess, "history limit reached");
        }
    }
}

impl HistoryStore for InMemoryHistory {
    fn create(&mut self, record: HistoryRecord) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry {
            id: HistoryId::new(),
            record,
        };
        self.entries.push(entry.clone());
        self.trim();
        Ok(entry)
    }

    fn list(&self) -> Vec<HistoryEntry> {
        // Ties keep reverse insertion order.
        let mut entries: Vec<HistoryEntry> = self.entries.iter().rev().cloned().collect();
        entries.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));
        entries
    }

    fn delete(&mut self, ids: &[HistoryId]) -> Result<usize, HistoryError> {
        let doomed: HashSet<&HistoryId> = ids.iter().collect();
        let before = self.entries.len();
        self.entries.retain(|e| !doomed.contains(&e.id));
        Ok(before - self.entries.len())
    }
}
