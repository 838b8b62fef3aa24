//! Single-line editable text field with a char-indexed caret.

#[derive(Debug, Default, Clone)]
pub struct InputLine {
    text: String,
    /// Caret position counted in chars, not bytes.
    cursor_pos: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Replaces the content and puts the caret at the end.
    pub fn set_value(&mut self, value: &str) {
        self.text = value.to_string();
        self.cursor_end();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_pos = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.byte_index(self.cursor_pos);
        self.text.insert(byte_pos, c);
        self.cursor_pos += 1;
    }

    pub fn remove_char_before(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let byte_pos = self.byte_index(self.cursor_pos - 1);
        self.text.remove(byte_pos);
        self.cursor_pos -= 1;
        true
    }

    pub fn remove_char_at(&mut self) -> bool {
        if self.cursor_pos >= self.char_count() {
            return false;
        }
        let byte_pos = self.byte_index(self.cursor_pos);
        self.text.remove(byte_pos);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor_pos < self.char_count() {
            self.cursor_pos += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.char_count();
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text_by_char() {
        let mut input = InputLine::new();
        for c in "héllo".chars() {
            input.insert_char(c);
        }
        input.cursor_left();
        input.cursor_left();
        input.cursor_left();
        assert!(input.remove_char_before());
        assert_eq!(input.text(), "hllo");
        assert_eq!(input.cursor_pos(), 1);

        input.insert_char('é');
        assert_eq!(input.text(), "héllo");
    }

    #[test]
    fn remove_at_end_is_noop() {
        let mut input = InputLine::new();
        input.set_value("ab");
        assert!(!input.remove_char_at());
        input.cursor_home();
        assert!(input.remove_char_at());
        assert_eq!(input.text(), "b");
    }

    #[test]
    fn set_value_moves_caret_to_end() {
        let mut input = InputLine::new();
        input.set_value("status");
        assert_eq!(input.cursor_pos(), 6);
        input.clear();
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor_pos(), 0);
    }
}
