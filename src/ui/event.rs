use crate::console::HistoryDirection;
use crossterm::event::KeyEvent;
use tokio::sync::oneshot;

/// Everything the console runner reacts to, from any task.
#[derive(Debug)]
pub enum UIEvent {
    /// Log text delivered by the transport.
    RemoteLog(String),
    /// A log line produced by this process.
    LocalLog(String),
    /// The transport connected (`true`) or dropped (`false`).
    ConnectionChanged(bool),
    /// A command submitted from outside the terminal, e.g. the web mirror.
    Submit(String),
    /// The input line gained focus.
    Focus,
    /// A history key pressed outside the terminal. When history is not
    /// empty, the recalled input text is sent back on `reply`.
    RecallHistory {
        direction: HistoryDirection,
        reply: oneshot::Sender<String>,
    },
    KeyPress(KeyEvent),
    Resize(u16, u16),
    /// Stop the console loop.
    Shutdown,
}
