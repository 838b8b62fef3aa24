use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{stdout, Write};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::console::{DebugConsole, Rect};
use crate::ui::pane::TerminalPane;

use super::TerminalUI;

const PROMPT: &str = "> ";

impl TerminalUI {
    /// Redraws the whole console window.
    ///
    /// Pane text comes from the views the controller last flushed into, so
    /// this may run as often as needed without touching log content.
    pub fn draw(&mut self, console: &DebugConsole) -> Result<()> {
        let mut stdout = stdout();
        let layout = *console.layout();

        queue!(stdout, cursor::Hide, Clear(ClearType::All))?;

        self.render_status_line(&mut stdout, layout.window)?;
        render_pane(&mut stdout, &self.page, layout.page_pane, Color::Grey)?;
        render_pane(&mut stdout, &self.remote, layout.remote_pane, Color::White)?;
        self.render_input_area(&mut stdout, console, layout.input)?;

        stdout.flush()?;
        Ok(())
    }

    fn render_status_line(&self, stdout: &mut impl Write, window: Rect) -> Result<()> {
        if window.width == 0 || window.height == 0 {
            return Ok(());
        }

        let (state, color) = if self.connected {
            ("connected", Color::Green)
        } else {
            ("disconnected", Color::Yellow)
        };
        let status_text = format!(
            " Console | {} {} | ↑↓: history | PgUp/PgDn: scroll | Ctrl+C: exit",
            self.target, state
        );
        let display_text = fit_to_width(&status_text, window.width as usize);

        queue!(
            stdout,
            cursor::MoveTo(window.x, window.y),
            SetBackgroundColor(Color::DarkGrey),
            SetForegroundColor(color),
            Print(&display_text)
        )?;

        let padding = (window.width as usize).saturating_sub(display_text.width());
        if padding > 0 {
            queue!(stdout, Print(" ".repeat(padding)))?;
        }

        queue!(stdout, ResetColor)?;
        Ok(())
    }

    fn render_input_area(
        &self,
        stdout: &mut impl Write,
        console: &DebugConsole,
        area: Rect,
    ) -> Result<()> {
        if area.width == 0 || area.height == 0 {
            return Ok(());
        }

        let input = console.input();
        let line = format!("{}{}", PROMPT, input.text());

        queue!(
            stdout,
            cursor::MoveTo(area.x, area.y),
            SetForegroundColor(Color::Cyan),
            Print(fit_to_width(&line, area.width as usize)),
            ResetColor
        )?;

        let cursor_x: usize = PROMPT.width()
            + input
                .text()
                .chars()
                .take(input.cursor_pos())
                .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
                .sum::<usize>();

        if cursor_x < area.width as usize {
            queue!(
                stdout,
                cursor::MoveTo(area.x + cursor_x as u16, area.y),
                cursor::Show
            )?;
        }

        Ok(())
    }
}

fn render_pane(
    stdout: &mut impl Write,
    pane: &TerminalPane,
    area: Rect,
    color: Color,
) -> Result<()> {
    if area.width == 0 || area.height == 0 {
        return Ok(());
    }

    let view = pane.view();
    for (row, line) in view.visible(area.height as usize).iter().enumerate() {
        queue!(
            stdout,
            cursor::MoveTo(area.x, area.y + row as u16),
            SetForegroundColor(color),
            Print(fit_to_width(line, area.width as usize)),
            ResetColor
        )?;
    }

    if view.scroll_offset() > 0 {
        let marker = format!("↑ +{}", view.scroll_offset());
        let x = area.right().saturating_sub(marker.width() as u16);
        queue!(
            stdout,
            cursor::MoveTo(x.max(area.x), area.y),
            SetForegroundColor(Color::Yellow),
            Print(fit_to_width(&marker, area.width as usize)),
            ResetColor
        )?;
    }

    Ok(())
}

/// Cuts `text` so its display width is at most `width`, marking the cut with `...`.
fn fit_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let budget = width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if width >= 3 {
        out.push_str("...");
    }
    out
}
