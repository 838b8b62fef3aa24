//! The single task that owns the console and serializes every event into it.
use super::terminal::{KeyOutcome, TerminalUI};
use super::tick::TickSource;
use super::UIEvent;
use crate::console::DebugConsole;
use anyhow::Result;
use crossterm::event::{self, Event};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub struct ConsoleRunner<T: TickSource> {
    console: DebugConsole,
    terminal: Option<TerminalUI>,
    events: mpsc::UnboundedReceiver<UIEvent>,
    ticker: T,
}

impl<T: TickSource> ConsoleRunner<T> {
    /// Creates a runner. Without a terminal the console still renders into
    /// its panes on every tick but nothing is drawn locally.
    pub fn new(
        console: DebugConsole,
        terminal: Option<TerminalUI>,
        events: mpsc::UnboundedReceiver<UIEvent>,
        ticker: T,
    ) -> Self {
        Self {
            console,
            terminal,
            events,
            ticker,
        }
    }

    /// Feeds previously captured remote log lines into the console.
    ///
    /// A single redraw is requested at the end instead of one per line.
    pub fn replay(&mut self, lines: Vec<String>) {
        info!("Replaying {} captured log lines", lines.len());
        for line in &lines {
            self.console.on_remote_log(Some(line));
        }
        self.console.trigger_update();
    }

    /// Runs until the event channel closes or the user exits.
    pub async fn run(mut self) -> Result<()> {
        if let Some(terminal) = self.terminal.as_mut() {
            let (width, height) = terminal.initialize_terminal()?;
            self.console.window_resized(width, height);
        }
        self.console.on_focus();

        debug!("Starting console loop");

        loop {
            tokio::select! {
                biased;

                _ = self.ticker.tick() => {
                    self.on_tick();
                    self.draw();
                }
                event = self.events.recv() => {
                    let Some(event) = event else {
                        debug!("Event channel closed");
                        break;
                    };
                    if self.handle_event(event) == KeyOutcome::Exit {
                        break;
                    }
                    self.draw();
                }
            }
        }

        if let Some(terminal) = self.terminal.as_mut() {
            terminal.cleanup()?;
        }
        Ok(())
    }

    pub(crate) fn on_tick(&mut self) -> usize {
        self.console.render()
    }

    pub(crate) fn handle_event(&mut self, event: UIEvent) -> KeyOutcome {
        match event {
            UIEvent::RemoteLog(text) => self.console.on_remote_log(Some(&text)),
            UIEvent::LocalLog(text) => self.console.log(Some(&text)),
            UIEvent::ConnectionChanged(connected) => {
                if let Some(terminal) = self.terminal.as_mut() {
                    terminal.set_connected(connected);
                }
                // Lines queued ahead of this event were handled after the
                // transport flag flipped, so either way they still need a draw.
                self.console.trigger_update();
            }
            UIEvent::Submit(text) => self.console.submit_input(&text),
            UIEvent::Focus => self.console.on_focus(),
            UIEvent::RecallHistory { direction, reply } => {
                if !self.console.history().is_empty() {
                    self.console.on_history_key(direction);
                    let _ = reply.send(self.console.input().text().to_string());
                }
            }
            UIEvent::KeyPress(key) => {
                if let Some(terminal) = self.terminal.as_mut() {
                    return terminal.handle_key(&mut self.console, key);
                }
            }
            UIEvent::Resize(width, height) => self.console.window_resized(width, height),
            UIEvent::Shutdown => return KeyOutcome::Exit,
        }
        KeyOutcome::Continue
    }

    fn draw(&mut self) {
        if let Some(terminal) = self.terminal.as_mut() {
            if let Err(e) = terminal.draw(&self.console) {
                error!("Failed to draw console: {}", e);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn console(&self) -> &DebugConsole {
        &self.console
    }
}

/// Forwards terminal input events to the runner until the channel closes.
pub fn spawn_terminal_reader(sender: mpsc::UnboundedSender<UIEvent>) {
    tokio::task::spawn_blocking(move || loop {
        if sender.is_closed() {
            break;
        }
        if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
            continue;
        }
        let forwarded = match event::read() {
            Ok(Event::Key(key_event)) => UIEvent::KeyPress(key_event),
            Ok(Event::Resize(width, height)) => UIEvent::Resize(width, height),
            Ok(Event::FocusGained) => UIEvent::Focus,
            Ok(_) => continue,
            Err(e) => {
                debug!("Failed to read terminal event: {}", e);
                break;
            }
        };
        if sender.send(forwarded).is_err() {
            break;
        }
    });
}
