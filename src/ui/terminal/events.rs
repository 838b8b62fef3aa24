use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::console::{DebugConsole, HistoryDirection};

use super::TerminalUI;

const PAGE_SCROLL: usize = 10;

/// What the runner should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Exit,
}

impl TerminalUI {
    /// Applies a key press to the console's input line and the pane views.
    ///
    /// Up and Down always go to history navigation and never move the caret.
    /// PageUp/PageDown scroll the remote pane; with Ctrl they scroll the page
    /// pane. Esc jumps both panes back to the newest line.
    pub fn handle_key(&mut self, console: &mut DebugConsole, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => return KeyOutcome::Exit,
            KeyCode::Enter => console.submit_current_input(),
            KeyCode::Up => console.on_history_key(HistoryDirection::Up),
            KeyCode::Down => console.on_history_key(HistoryDirection::Down),
            KeyCode::Char(c) => console.input_mut().insert_char(c),
            KeyCode::Backspace => {
                console.input_mut().remove_char_before();
            }
            KeyCode::Delete => {
                console.input_mut().remove_char_at();
            }
            KeyCode::Left => console.input_mut().cursor_left(),
            KeyCode::Right => console.input_mut().cursor_right(),
            KeyCode::Home => console.input_mut().cursor_home(),
            KeyCode::End => console.input_mut().cursor_end(),
            KeyCode::PageUp => {
                let height = self.pane_height(console, ctrl);
                self.scroll_target(ctrl).view().scroll_up(PAGE_SCROLL, height);
            }
            KeyCode::PageDown => {
                self.scroll_target(ctrl).view().scroll_down(PAGE_SCROLL);
            }
            KeyCode::Esc => {
                self.page.view().jump_to_bottom();
                self.remote.view().jump_to_bottom();
            }
            _ => {}
        }

        KeyOutcome::Continue
    }

    fn scroll_target(&self, page: bool) -> &crate::ui::pane::TerminalPane {
        if page {
            &self.page
        } else {
            &self.remote
        }
    }

    fn pane_height(&self, console: &DebugConsole, page: bool) -> usize {
        let layout = console.layout();
        let rect = if page {
            layout.page_pane
        } else {
            layout.remote_pane
        };
        rect.height as usize
    }
}
