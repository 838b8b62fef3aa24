//! The debug console controller and the pieces it is built from.
//!
//! [`DebugConsole`] owns two log buffers (the local page log and the remote
//! application log), the command history, and the input line. Appends only
//! touch the buffers; panes are updated from [`DebugConsole::render`], which
//! the runner calls on a fixed tick.
pub mod buffer;
pub mod escape;
pub mod history;
pub mod input;
pub mod layout;
pub mod pane;

pub use buffer::PaneBuffer;
pub use escape::{Clock, LocalClock};
pub use history::{CommandHistory, HistoryDirection};
pub use input::InputLine;
pub use layout::{ConsoleLayout, LayoutMetrics, Rect};
pub use pane::TextPane;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::storage::HistoryStore;
use crate::transport::Transport;

/// Tunables for the console controller.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Byte cap for each log buffer.
    pub buffer_max_len: usize,
    /// Maximum number of remembered commands.
    pub max_commands: usize,
    /// Tag prepended to every command sent to the remote endpoint.
    pub command_prefix: String,
    /// Cadence of the render tick.
    pub render_interval: Duration,
    pub layout: LayoutMetrics,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            buffer_max_len: 100 * 1024,
            max_commands: 10_000,
            command_prefix: "CONI".to_string(),
            render_interval: Duration::from_millis(500),
            layout: LayoutMetrics::default(),
        }
    }
}

/// The two display surfaces a console draws into.
pub struct ConsolePanes {
    pub page: Box<dyn TextPane>,
    pub remote: Box<dyn TextPane>,
}

pub struct DebugConsole {
    config: ConsoleConfig,
    page: PaneBuffer,
    remote: PaneBuffer,
    panes: ConsolePanes,
    history: CommandHistory,
    input: InputLine,
    store: Box<dyn HistoryStore>,
    transport: Arc<dyn Transport>,
    clock: Box<dyn Clock>,
    layout: ConsoleLayout,
}

impl DebugConsole {
    /// Creates the console and loads the persisted command history.
    ///
    /// A history that fails to load is logged and replaced by an empty one.
    pub fn new(
        config: ConsoleConfig,
        panes: ConsolePanes,
        store: Box<dyn HistoryStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let saved = match store.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load command history: {}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} history entries", saved.len());

        Self {
            page: PaneBuffer::new(config.buffer_max_len),
            remote: PaneBuffer::new(config.buffer_max_len),
            history: CommandHistory::new(saved, config.max_commands),
            input: InputLine::new(),
            panes,
            store,
            transport,
            clock: Box::new(LocalClock),
            layout: ConsoleLayout::default(),
            config,
        }
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Appends a line to the page log.
    pub fn log(&mut self, text: Option<&str>) {
        self.page.append(text, self.clock.as_ref());
        self.page.mark_dirty();
    }

    /// Forces the remote pane to redraw on the next tick.
    pub fn trigger_update(&mut self) {
        self.remote.mark_dirty();
    }

    /// Appends a line delivered by the transport to the remote log.
    ///
    /// While the transport is disconnected the text is stored but no redraw
    /// is scheduled: that is backlog being loaded, and a single
    /// [`trigger_update`](Self::trigger_update) follows once it is done.
    pub fn on_remote_log(&mut self, text: Option<&str>) {
        self.remote.append(text, self.clock.as_ref());
        if self.transport.is_connected() {
            self.remote.mark_dirty();
        }
    }

    /// Flushes dirty buffers to their panes and returns how many were updated.
    pub fn render(&mut self) -> usize {
        let mut updated = 0;

        if let Some(html) = self.page.take_pending() {
            self.panes.page.set_content(html);
            self.panes.page.scroll_to_bottom();
            updated += 1;
        }

        if let Some(html) = self.remote.take_pending() {
            self.panes.remote.set_content(html);
            self.panes.remote.scroll_to_bottom();
            updated += 1;
        }

        updated
    }

    /// Sends `text` to the remote endpoint and records it in history.
    pub fn submit_input(&mut self, text: &str) {
        let message = format!("{}{}", self.config.command_prefix, text);
        self.transport.send(&message);

        self.log(Some(&format!("> {}", text)));
        self.input.clear();

        self.history.push(text.to_string());
        if let Err(e) = self.store.save(self.history.entries()) {
            warn!("Failed to persist command history: {}", e);
        }
    }

    /// Submits whatever is in the input line. Blank lines are ignored.
    pub fn submit_current_input(&mut self) {
        if self.input.text().trim().is_empty() {
            return;
        }
        let text = self.input.text().to_string();
        self.submit_input(&text);
    }

    /// Cycles the input line through the command history.
    pub fn on_history_key(&mut self, direction: HistoryDirection) {
        if let Some(command) = self.history.navigate(direction) {
            self.input.set_value(command);
        }
    }

    /// Resets history navigation so the first `Up` shows the latest command.
    pub fn on_focus(&mut self) {
        self.history.reset_cursor();
    }

    /// Recomputes control placement for a container of the given size.
    pub fn window_resized(&mut self, width: u16, height: u16) {
        self.layout = ConsoleLayout::compute(&self.config.layout, width, height);
    }

    pub fn layout(&self) -> &ConsoleLayout {
        &self.layout
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputLine {
        &mut self.input
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn page_buffer(&self) -> &PaneBuffer {
        &self.page
    }

    pub fn remote_buffer(&self) -> &PaneBuffer {
        &self.remote
    }
}

#[cfg(test)]
mod tests {
    use super::escape::FixedClock;
    use super::pane::testing::RecordingPane;
    use super::*;
    use crate::storage::MemoryHistoryStore;
    use crate::transport::testing::RecordingTransport;

    struct Harness {
        console: DebugConsole,
        page: RecordingPane,
        remote: RecordingPane,
        store: MemoryHistoryStore,
        transport: Arc<RecordingTransport>,
    }

    fn harness_with(config: ConsoleConfig, history: Vec<&str>) -> Harness {
        let page = RecordingPane::default();
        let remote = RecordingPane::default();
        let store = MemoryHistoryStore::with_entries(history.into_iter().map(String::from));
        let transport = Arc::new(RecordingTransport::new(true));

        let console = DebugConsole::new(
            config,
            ConsolePanes {
                page: Box::new(page.clone()),
                remote: Box::new(remote.clone()),
            },
            Box::new(store.clone()),
            transport.clone(),
        )
        .with_clock(Box::new(FixedClock::new("10:00:00")));

        Harness {
            console,
            page,
            remote,
            store,
            transport,
        }
    }

    fn harness() -> Harness {
        harness_with(ConsoleConfig::default(), Vec::new())
    }

    #[test]
    fn render_without_dirty_buffers_touches_nothing() {
        let mut h = harness();
        assert_eq!(h.console.render(), 0);
        assert_eq!(h.page.set_content_calls(), 0);
        assert_eq!(h.remote.set_content_calls(), 0);
    }

    #[test]
    fn many_logs_collapse_into_one_render() {
        let mut h = harness();
        for i in 0..50 {
            h.console.log(Some(&format!("event {i}")));
        }

        assert_eq!(h.console.render(), 1);
        assert_eq!(h.page.set_content_calls(), 1);
        assert_eq!(h.page.scrolls(), 1);
        assert!(h.page.last_content().unwrap().ends_with("event 49<br>"));

        assert_eq!(h.console.render(), 0);
        assert_eq!(h.page.set_content_calls(), 1);
    }

    #[test]
    fn log_null_uses_placeholder() {
        let mut h = harness();
        h.console.log(None);
        h.console.render();
        assert_eq!(
            h.page.last_content().as_deref(),
            Some("[10:00:00] NULL<br>")
        );
    }

    #[test]
    fn remote_log_redraws_when_connected() {
        let mut h = harness();
        h.console.on_remote_log(Some("frame 1"));
        assert_eq!(h.console.render(), 1);
        assert_eq!(
            h.remote.last_content().as_deref(),
            Some("[10:00:00] frame 1<br>")
        );
    }

    #[test]
    fn remote_log_while_disconnected_waits_for_trigger() {
        let mut h = harness();
        h.transport.set_connected(false);

        for i in 0..10 {
            h.console.on_remote_log(Some(&format!("backlog {i}")));
        }
        assert_eq!(h.console.render(), 0);
        assert_eq!(h.remote.set_content_calls(), 0);

        h.console.trigger_update();
        assert_eq!(h.console.render(), 1);
        let content = h.remote.last_content().unwrap();
        assert!(content.contains("backlog 0"));
        assert!(content.contains("backlog 9"));
    }

    #[test]
    fn trigger_update_rerenders_unchanged_content() {
        let mut h = harness();
        h.console.on_remote_log(Some("x"));
        h.console.render();

        h.console.trigger_update();
        assert_eq!(h.console.render(), 1);
        assert_eq!(h.remote.set_content_calls(), 2);
        let probe = h.remote.probe.lock().unwrap();
        assert_eq!(probe.contents[0], probe.contents[1]);
    }

    #[test]
    fn submit_sends_prefixed_message_once() {
        let mut h = harness();
        h.console.submit_input("ping");

        assert_eq!(h.transport.sent(), vec!["CONIping".to_string()]);
        assert_eq!(h.console.history().entries(), ["ping"]);
        assert_eq!(h.console.history().index(), 1);
        assert_eq!(h.store.snapshot(), vec!["ping".to_string()]);

        h.console.render();
        assert!(h.page.last_content().unwrap().ends_with("&gt; ping<br>"));
    }

    #[test]
    fn submit_clears_input_line() {
        let mut h = harness();
        h.console.input_mut().set_value("stats");
        h.console.submit_current_input();

        assert_eq!(h.console.input().text(), "");
        assert_eq!(h.transport.sent(), vec!["CONIstats".to_string()]);
    }

    #[test]
    fn blank_input_is_not_submitted() {
        let mut h = harness();
        h.console.input_mut().set_value("   ");
        h.console.submit_current_input();
        assert!(h.transport.sent().is_empty());
        assert!(h.console.history().is_empty());
    }

    #[test]
    fn full_history_evicts_oldest_on_submit() {
        let config = ConsoleConfig {
            max_commands: 3,
            ..ConsoleConfig::default()
        };
        let mut h = harness_with(config, vec!["a", "b", "c"]);

        h.console.submit_input("d");
        assert_eq!(h.console.history().entries(), ["b", "c", "d"]);
        assert_eq!(h.store.snapshot(), vec!["b", "c", "d"]);
    }

    #[test]
    fn history_keys_fill_input() {
        let mut h = harness_with(ConsoleConfig::default(), vec!["a", "b", "c"]);
        h.console.on_focus();

        h.console.on_history_key(HistoryDirection::Up);
        assert_eq!(h.console.input().text(), "c");
        h.console.on_history_key(HistoryDirection::Up);
        h.console.on_history_key(HistoryDirection::Up);
        assert_eq!(h.console.input().text(), "a");
        h.console.on_history_key(HistoryDirection::Up);
        assert_eq!(h.console.input().text(), "c");
        assert_eq!(h.console.input().cursor_pos(), 1);

        h.console.on_history_key(HistoryDirection::Down);
        assert_eq!(h.console.input().text(), "a");
    }

    #[test]
    fn history_keys_on_empty_history_leave_input() {
        let mut h = harness();
        h.console.input_mut().set_value("draft");
        h.console.on_history_key(HistoryDirection::Up);
        assert_eq!(h.console.input().text(), "draft");
    }

    #[test]
    fn failed_history_load_starts_empty() {
        let store = MemoryHistoryStore::failing();
        let console = DebugConsole::new(
            ConsoleConfig::default(),
            ConsolePanes {
                page: Box::new(RecordingPane::default()),
                remote: Box::new(RecordingPane::default()),
            },
            Box::new(store),
            Arc::new(RecordingTransport::new(true)),
        );
        assert!(console.history().is_empty());
    }

    #[test]
    fn buffers_stay_capped() {
        let config = ConsoleConfig {
            buffer_max_len: 256,
            ..ConsoleConfig::default()
        };
        let mut h = harness_with(config, Vec::new());
        for i in 0..200 {
            h.console.log(Some(&format!("<tag attr='{i}'>")));
            h.console.on_remote_log(Some("remote & more"));
        }
        assert!(h.console.page_buffer().len() <= 256);
        assert!(h.console.remote_buffer().len() <= 256);
    }

    #[test]
    fn resize_updates_layout() {
        let mut h = harness();
        h.console.window_resized(90, 30);
        assert_eq!(h.console.layout().window.width, 88);
    }
}
