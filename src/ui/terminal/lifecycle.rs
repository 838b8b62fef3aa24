use anyhow::Result;
use crossterm::{
    cursor,
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{self},
};
use std::io::stdout;

use super::TerminalUI;

impl TerminalUI {
    /// Switches to raw mode on the alternate screen and returns the terminal size.
    pub fn initialize_terminal(&mut self) -> Result<(u16, u16)> {
        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableFocusChange)?;

        let size = terminal::size()?;
        Ok(size)
    }

    pub fn cleanup(&mut self) -> Result<()> {
        if !self.raw_mode {
            return Ok(());
        }
        self.raw_mode = false;
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        Ok(())
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
