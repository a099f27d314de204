//! Bounded, append-only game message log.
//!
//! Purely observational: the engine writes here for UI display and debugging
//! but never reads it back for gameplay decisions. Backed by an `im::Vector`
//! so cloning the state for search shares structure instead of copying the
//! whole history.

use im::Vector;
use serde::{Deserialize, Serialize};

/// Maximum number of retained log entries.
pub const LOG_CAPACITY: usize = 50;

/// Append-only message log, bounded to the most recent [`LOG_CAPACITY`]
/// entries.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vector<String>,
}

impl GameLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, evicting the oldest entry past capacity.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_back(message.into());
        if self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Iterate over retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry, if any.
    #[must_use]
    pub fn last(&self) -> Option<&String> {
        self.entries.last()
    }
}
