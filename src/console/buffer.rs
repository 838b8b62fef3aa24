//! Accumulated HTML log text for one pane, plus its pending-render flag.
use super::escape::{log_text, Clock};

/// An append-only string of rendered log lines capped at a byte length.
///
/// When an append pushes the buffer past `max_len`, the oldest bytes are
/// dropped from the front. There is no line awareness, so the first retained
/// line may be partial.
#[derive(Debug, Clone)]
pub struct PaneBuffer {
    text: String,
    max_len: usize,
    dirty: bool,
}

impl PaneBuffer {
    /// Creates an empty, clean buffer.
    pub fn new(max_len: usize) -> Self {
        Self {
            text: String::new(),
            max_len,
            dirty: false,
        }
    }

    /// Escapes, timestamps and appends a line, then trims to the cap.
    ///
    /// Does not touch the dirty flag; callers decide whether the append
    /// should schedule a redraw.
    pub fn append(&mut self, text: Option<&str>, clock: &dyn Clock) {
        self.text.push_str(&log_text(text, clock));
        self.trim_front();
    }

    /// Marks the buffer as needing a render.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the current text if dirty and clears the flag.
    pub fn take_pending(&mut self) -> Option<&str> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(&self.text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    fn trim_front(&mut self) {
        let len = self.text.len();
        if len <= self.max_len {
            return;
        }

        // Never split a UTF-8 sequence; step forward to the next boundary.
        let mut start = len - self.max_len;
        while !self.text.is_char_boundary(start) {
            start += 1;
        }
        self.text.drain(..start);
    }
}
