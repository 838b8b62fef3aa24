//! The display capability a console pane needs.

/// A read-only, scrollable surface that shows one log buffer.
pub trait TextPane: Send {
    /// Replaces everything the pane shows with `html`.
    fn set_content(&mut self, html: &str);

    /// Scrolls so the newest line is visible.
    fn scroll_to_bottom(&mut self);
}

impl<A: TextPane, B: TextPane> TextPane for (A, B) {
    fn set_content(&mut self, html: &str) {
        self.0.set_content(html);
        self.1.set_content(html);
    }

    fn scroll_to_bottom(&mut self) {
        self.0.scroll_to_bottom();
        self.1.scroll_to_bottom();
    }
}

impl<P: TextPane + ?Sized> TextPane for Box<P> {
    fn set_content(&mut self, html: &str) {
        (**self).set_content(html);
    }

    fn scroll_to_bottom(&mut self) {
        (**self).scroll_to_bottom();
    }
}

#[cfg(test)]
pub mod testing {
    use super::TextPane;
    use std::sync::{Arc, Mutex};

    /// Counters shared between a [`RecordingPane`] and the test body.
    #[derive(Debug, Default)]
    pub struct PaneProbe {
        pub contents: Vec<String>,
        pub scrolls: usize,
    }

    /// A pane that records every call it receives.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPane {
        pub probe: Arc<Mutex<PaneProbe>>,
    }

    impl RecordingPane {
        pub fn set_content_calls(&self) -> usize {
            self.probe.lock().unwrap().contents.len()
        }

        pub fn last_content(&self) -> Option<String> {
            self.probe.lock().unwrap().contents.last().cloned()
        }

        pub fn scrolls(&self) -> usize {
            self.probe.lock().unwrap().scrolls
        }
    }

    impl TextPane for RecordingPane {
        fn set_content(&mut self, html: &str) {
            self.probe.lock().unwrap().contents.push(html.to_string());
        }

        fn scroll_to_bottom(&mut self) {
            self.probe.lock().unwrap().scrolls += 1;
        }
    }

    #[test]
    fn pair_forwards_to_both() {
        let left = RecordingPane::default();
        let right = RecordingPane::default();
        let mut pair = (left.clone(), right.clone());

        pair.set_content("x<br>");
        pair.scroll_to_bottom();

        assert_eq!(left.last_content().as_deref(), Some("x<br>"));
        assert_eq!(right.scrolls(), 1);
    }
}
