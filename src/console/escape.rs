//! Turns raw log text into a timestamped, markup-safe HTML line.
use chrono::Local;

/// Substituted for missing log text.
pub const NULL_PLACEHOLDER: &str = "NULL";

/// Terminates every stored line.
pub const LINE_BREAK: &str = "<br>";

/// Source of the wall-clock prefix on each log line.
pub trait Clock: Send {
    /// Returns the time of day as it should appear inside the brackets.
    fn time_of_day(&self) -> String;
}

/// Local time, formatted `HH:MM:SS`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn time_of_day(&self) -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

/// A clock frozen at a given string.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock(String);

#[cfg(test)]
impl FixedClock {
    pub fn new(time: &str) -> Self {
        Self(time.to_string())
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn time_of_day(&self) -> String {
        self.0.clone()
    }
}

/// Builds one stored log line: `[time] escaped-text<br>`.
pub fn log_text(text: Option<&str>, clock: &dyn Clock) -> String {
    let text = text.unwrap_or(NULL_PLACEHOLDER);
    let escaped = escape_html(text);

    let mut line = String::with_capacity(escaped.len() + 16);
    line.push('[');
    line.push_str(&clock.time_of_day());
    line.push_str("] ");
    line.push_str(&escaped);
    line.push_str(LINE_BREAK);
    line
}

/// Replaces markup-significant characters with entity references.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverses [`escape_html`] for front ends that display plain text.
pub fn unescape_html(html: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
    ];

    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
