//! State management for calculator front ends.
//!
//! This module implements the Elm Architecture pattern:
//! `State + Message → (State, Command)`. Side effects such as persisting a
//! history record are returned as [`Command`]s and carried out by a
//! [`Store`], never performed inside `update`.
//!
//! # Examples
//!
//! ```
//! use bitcalc_core::{Command, State};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct Tally {
//!     count: i32,
//! }
//!
//! enum TallyMessage {
//!     Add(i32),
//!     Reset,
//! }
//!
//! impl State for Tally {
//!     type Message = TallyMessage;
//!
//!     fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
//!         match msg {
//!             TallyMessage::Add(n) => self.count += n,
//!             TallyMessage::Reset => self.count = 0,
//!         }
//!         Command::None
//!     }
//! }
//!
//! let mut tally = Tally::default();
//! tally.update(TallyMessage::Add(3));
//! assert_eq!(tally.count, 3);
//! ```

use crate::error::HistoryError;
use crate::history::{HistoryEntry, HistoryRecord, HistoryStore};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Application state trait.
///
/// Implements the Elm Architecture: State + Message → (State, Command)
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Message type for state updates
    type Message: Send;

    /// Update state in response to a message.
    ///
    /// Returns a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;
}

/// Commands for side effects.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Command<M> {
    /// No command
    #[default]
    None,
    /// Execute multiple commands
    Batch(Vec<Command<M>>),
    /// Feed a follow-up message back into `update`
    Dispatch(M),
    /// Hand a record to the history store
    Persist {
        /// Record to store
        record: HistoryRecord,
    },
}

impl<M> Command<M> {
    /// Create a batch of commands.
    pub fn batch(commands: impl IntoIterator<Item = Self>) -> Self {
        Self::Batch(commands.into_iter().collect())
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Records this command would persist, in order.
    pub fn records(&self) -> Vec<&HistoryRecord> {
        let mut out = Vec::new();
        self.collect_records(&mut out);
        out
    }

    fn collect_records<'a>(&'a self, out: &mut Vec<&'a HistoryRecord>) {
        match self {
            Self::Persist { record } => out.push(record),
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.collect_records(out);
                }
            }
            Self::None | Self::Dispatch(_) => {}
        }
    }
}

/// Type alias for state change subscribers.
type Subscriber<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Store runs a state's update loop and carries out its commands.
///
/// `Dispatch` commands are fed back into `update` in order; `Persist`
/// commands go to the history store.
pub struct Store<S: State, H: HistoryStore> {
    state: S,
    history: H,
    subscribers: Vec<Subscriber<S>>,
}

impl<S: State, H: HistoryStore> Store<S, H> {
    /// Create a new store with initial state and a history backend.
    pub fn new(initial: S, history: H) -> Self {
        Self {
            state: initial,
            history,
            subscribers: Vec::new(),
        }
    }

    /// Get current state.
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// History backend.
    pub const fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Dispatch a message and run every command it produces.
    ///
    /// Returns the history entries created along the way. A failing store
    /// stops command processing; the state update itself is kept.
    pub fn dispatch(&mut self, msg: S::Message) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut created = Vec::new();
        let mut queue = VecDeque::from([msg]);

        while let Some(msg) = queue.pop_front() {
            let cmd = self.state.update(msg);
            self.notify_subscribers();
            self.run(cmd, &mut queue, &mut created)?;
        }

        Ok(created)
    }

    fn run(
        &mut self,
        cmd: Command<S::Message>,
        queue: &mut VecDeque<S::Message>,
        created: &mut Vec<HistoryEntry>,
    ) -> Result<(), HistoryError> {
        match cmd {
            Command::None => {}
            Command::Batch(cmds) => {
                for cmd in cmds {
                    self.run(cmd, queue, created)?;
                }
            }
            Command::Dispatch(msg) => queue.push_back(msg),
            Command::Persist { record } => {
                let entry = self.history.create(record)?;
                tracing::debug!(id = %entry.id, formula = %entry.record.formula, "history entry stored");
                created.push(entry);
            }
        }
        Ok(())
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    fn notify_subscribers(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.state);
        }
    }
}
