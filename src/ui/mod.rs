//! Terminal front end and the event loop that drives the console.
pub mod event;
pub mod pane;
pub mod runner;
pub mod terminal;
pub mod tick;

pub use event::UIEvent;
pub use pane::TerminalPane;
pub use runner::{spawn_terminal_reader, ConsoleRunner};
pub use terminal::TerminalUI;
pub use tick::{IntervalTicker, TickSource};
