//! This module provides a `tracing` layer that routes this process's own log
//! events into the console's page log.
use crate::ui::UIEvent;
use std::fmt::Write as _;
use tokio::sync::mpsc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

/// A `tracing` layer that forwards each event as a [`UIEvent::LocalLog`].
pub struct ConsoleLogCollector {
    sender: mpsc::UnboundedSender<UIEvent>,
}

impl ConsoleLogCollector {
    /// Creates a new `ConsoleLogCollector`.
    ///
    /// # Arguments
    ///
    /// * `sender` - The channel the runner reads UI events from.
    pub fn new(sender: mpsc::UnboundedSender<UIEvent>) -> Self {
        Self { sender }
    }
}

impl<S> Layer<S> for ConsoleLogCollector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    /// Formats the event as `LEVEL module: message` and sends it to the UI.
    ///
    /// A closed channel means the UI has shut down; the event is dropped.
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut message = String::new();
        let mut visitor = MessageVisitor(&mut message);
        event.record(&mut visitor);

        let module = metadata
            .module_path()
            .map(|path| path.rsplit("::").next().unwrap_or(path))
            .unwrap_or_else(|| metadata.target());

        let line = format!("{} {}: {}", level_label(metadata.level()), module, message);
        let _ = self.sender.send(UIEvent::LocalLog(line));
    }
}

fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// A `tracing::field::Visit` implementation for extracting the message from an event.
struct MessageVisitor<'a>(&'a mut String);

impl MessageVisitor<'_> {
    fn push_field(&mut self, name: &str, value: impl std::fmt::Display) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        let _ = write!(self.0, "{}={}", name, value);
    }
}

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let fields = std::mem::take(self.0);
            let _ = write!(self.0, "{:?}", value);
            if !fields.is_empty() {
                self.0.push(' ');
                self.0.push_str(&fields);
            }
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.record_debug(field, &format_args!("{}", value));
        } else {
            self.push_field(field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn collect(f: impl FnOnce()) -> Vec<String> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscriber = tracing_subscriber::registry().with(ConsoleLogCollector::new(tx));
        tracing::subscriber::with_default(subscriber, f);

        let mut lines = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let UIEvent::LocalLog(line) = event {
                lines.push(line);
            }
        }
        lines
    }

    #[test]
    fn formats_level_module_and_message() {
        let lines = collect(|| tracing::warn!("disk almost full"));
        assert_eq!(lines, vec!["WARN tests: disk almost full"]);
    }

    #[test]
    fn appends_structured_fields() {
        let lines = collect(|| tracing::info!(port = 17815, "listening"));
        assert_eq!(lines, vec!["INFO tests: listening port=17815"]);
    }
}
