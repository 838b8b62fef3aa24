//! This module defines the crossterm front end for the debug console.
mod events;
mod lifecycle;
mod render;

pub use events::KeyOutcome;

use super::pane::TerminalPane;

/// Draws a [`DebugConsole`](crate::console::DebugConsole) into the terminal
/// and translates key presses into console operations.
pub struct TerminalUI {
    pub(super) page: TerminalPane,
    pub(super) remote: TerminalPane,
    pub(super) connected: bool,
    pub(super) target: String,
    pub(super) raw_mode: bool,
}

impl TerminalUI {
    /// Creates a front end reading pane content from the given handles.
    ///
    /// `target` names the remote endpoint in the status line.
    pub fn new(page: TerminalPane, remote: TerminalPane, target: String) -> Self {
        Self {
            page,
            remote,
            connected: false,
            target,
            raw_mode: false,
        }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}
