//! Bounded list of submitted commands with a wrapping navigation cursor.
use serde::{Deserialize, Serialize};

/// Direction of a history navigation key.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDirection {
    /// Towards older entries.
    Up,
    /// Towards newer entries.
    Down,
}

#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: Vec<String>,
    max_entries: usize,
    /// Ranges over `0..=entries.len()`; `entries.len()` means "past the end".
    index: usize,
}

impl CommandHistory {
    /// Creates a history from previously persisted entries.
    ///
    /// If `entries` is longer than `max_entries`, only the newest are kept.
    /// The cursor starts at 0 until the first focus or submission.
    pub fn new(mut entries: Vec<String>, max_entries: usize) -> Self {
        if entries.len() > max_entries {
            entries.drain(..entries.len() - max_entries);
        }
        Self {
            entries,
            max_entries,
            index: 0,
        }
    }

    /// Records a command, evicting the oldest entries past the cap, and moves
    /// the cursor past the end.
    pub fn push(&mut self, command: String) {
        self.entries.push(command);
        let extra = self.entries.len().saturating_sub(self.max_entries);
        if extra > 0 {
            self.entries.drain(..extra);
        }
        self.reset_cursor();
    }

    /// Moves the cursor past the last entry, so the next `Up` shows the most
    /// recent command.
    pub fn reset_cursor(&mut self) {
        self.index = self.entries.len();
    }

    /// Steps the cursor with wraparound and returns the entry under it.
    ///
    /// `Down` is `(index + 1) % len` even from past the end, so it lands on
    /// the second entry there rather than the first.
    ///
    /// Returns `None` only when the history is empty.
    pub fn navigate(&mut self, direction: HistoryDirection) -> Option<&str> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }

        self.index = match direction {
            HistoryDirection::Up => {
                if self.index == 0 {
                    len - 1
                } else {
                    // A cursor past the end lands on the last entry.
                    (self.index - 1).min(len - 1)
                }
            }
            HistoryDirection::Down => (self.index + 1) % len,
        };

        self.entries.get(self.index).map(String::as_str)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
