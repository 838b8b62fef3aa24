//! Terminal-side storage for pane content.
use crate::console::escape::{unescape_html, LINE_BREAK};
use crate::console::TextPane;
use std::sync::{Arc, Mutex, MutexGuard};

/// Plain-text lines of one pane plus how far the user has scrolled up.
#[derive(Debug, Default)]
pub struct PaneView {
    lines: Vec<String>,
    /// Lines between the bottom of the view and the newest line.
    scroll_offset: usize,
}

impl PaneView {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Returns the slice of lines that fits in `height` rows.
    pub fn visible(&self, height: usize) -> &[String] {
        let total = self.lines.len();
        let end = total.saturating_sub(self.scroll_offset);
        let start = end.saturating_sub(height);
        &self.lines[start..end]
    }

    pub fn scroll_up(&mut self, amount: usize, height: usize) {
        let max_scroll = self.lines.len().saturating_sub(height);
        self.scroll_offset = (self.scroll_offset + amount).min(max_scroll);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn jump_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    fn replace(&mut self, html: &str) {
        self.lines = html
            .split(LINE_BREAK)
            .map(unescape_html)
            .collect();
        if self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        self.scroll_offset = self.scroll_offset.min(self.lines.len());
    }
}

/// A [`TextPane`] that turns HTML into lines for the terminal drawer.
///
/// Clones share the same view, so the controller can own one handle while
/// the drawer reads through another.
#[derive(Debug, Clone, Default)]
pub struct TerminalPane {
    view: Arc<Mutex<PaneView>>,
}

impl TerminalPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> MutexGuard<'_, PaneView> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TextPane for TerminalPane {
    fn set_content(&mut self, html: &str) {
        self.view().replace(html);
    }

    fn scroll_to_bottom(&mut self) {
        self.view().jump_to_bottom();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_decodes_lines() {
        let mut pane = TerminalPane::new();
        pane.set_content("[10:00:00] a &lt; b<br>[10:00:01] &quot;q&quot;<br>");

        let view = pane.view();
        assert_eq!(
            view.lines(),
            ["[10:00:00] a < b", "[10:00:01] \"q\""]
        );
    }

    #[test]
    fn visible_follows_scroll_offset() {
        let mut pane = TerminalPane::new();
        let html: String = (0..10).map(|i| format!("{i}<br>")).collect();
        pane.set_content(&html);

        let mut view = pane.view();
        assert_eq!(view.visible(3), ["7", "8", "9"]);

        view.scroll_up(2, 3);
        assert_eq!(view.visible(3), ["5", "6", "7"]);

        view.scroll_up(100, 3);
        assert_eq!(view.visible(3), ["0", "1", "2"]);

        view.scroll_down(1);
        assert_eq!(view.visible(3), ["1", "2", "3"]);
    }

    #[test]
    fn scroll_to_bottom_resets_offset() {
        let mut pane = TerminalPane::new();
        pane.set_content("a<br>b<br>c<br>");
        pane.view().scroll_up(1, 1);
        pane.scroll_to_bottom();
        assert_eq!(pane.view().scroll_offset(), 0);
    }

    #[test]
    fn empty_content_has_no_lines() {
        let mut pane = TerminalPane::new();
        pane.set_content("");
        assert!(pane.view().lines().is_empty());
        assert!(pane.view().visible(5).is_empty());
    }
}
