//! Output history for fixline
//!
//! Keeps the most recent chunks written through a session, oldest first.

use std::collections::VecDeque;

/// Default number of retained entries
pub const HISTORY_LIMIT: usize = 50;

/// Bounded log of emitted output
#[derive(Debug, Clone)]
pub struct OutputHistory {
    /// Entries (newest last)
    entries: VecDeque<String>,
    /// Maximum entries
    max_entries: usize,
}

impl Default for OutputHistory {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl OutputHistory {
    /// Create an empty history holding at most `max_entries` items
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    /// Append an entry, evicting the oldest ones past the limit
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push_back(entry.into());
        self.trim();
    }

    /// Change the capacity; shrinking evicts immediately
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
        self.trim();
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn trim(&mut self) {
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Get recent history (newest first)
    pub fn recent(&self, count: usize) -> Vec<&str> {
        self.iter().rev().take(count).collect()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
