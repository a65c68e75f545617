use crate::util::unicode::{column_of, next_grapheme_boundary, prev_grapheme_boundary, word_start_before};

/// Single-line input buffer with a grapheme-aware cursor (byte offset)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Terminal column of the cursor within the buffer
    pub fn cursor_column(&self) -> usize {
        column_of(&self.buffer, self.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replace the whole line, cursor at the end
    pub fn set(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    /// Take the line, leaving the editor empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text; newlines become spaces
    pub fn insert_str(&mut self, text: &str) {
        let clean = text.replace('\r', "").replace('\n', " ");
        self.buffer.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(self.cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Ctrl+W
    pub fn delete_word_before(&mut self) {
        let start = word_start_before(&self.buffer, self.cursor);
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Ctrl+U
    pub fn kill_to_start(&mut self) {
        self.buffer.replace_range(..self.cursor, "");
        self.cursor = 0;
    }

    /// Ctrl+K
    pub fn kill_to_end(&mut self) {
        self.buffer.truncate(self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_moving() {
        let mut ed = LineEditor::new();
        for c in "add mlk".chars() {
            ed.insert_char(c);
        }
        ed.left();
        ed.left();
        ed.insert_char('i');
        assert_eq!(ed.text(), "add milk");
        ed.end();
        ed.backspace();
        assert_eq!(ed.text(), "add mil");
        ed.home();
        ed.delete();
        assert_eq!(ed.text(), "dd mil");
    }

    #[test]
    fn graphemes_move_as_one() {
        let mut ed = LineEditor::new();
        ed.set("ok 👍🏽");
        ed.backspace();
        assert_eq!(ed.text(), "ok ");
        ed.set("日本");
        ed.left();
        assert_eq!(ed.cursor_column(), 2);
    }

    #[test]
    fn kill_commands() {
        let mut ed = LineEditor::new();
        ed.set("add buy milk");
        ed.delete_word_before();
        assert_eq!(ed.text(), "add buy ");
        ed.left();
        ed.left();
        ed.kill_to_end();
        assert_eq!(ed.text(), "add bu");
        ed.kill_to_start();
        assert!(ed.is_empty());
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut ed = LineEditor::new();
        ed.insert_str("import abc\r\ndef");
        assert_eq!(ed.text(), "import abc def");
        assert_eq!(ed.take(), "import abc def");
        assert_eq!(ed.cursor(), 0);
    }

    #[test]
    fn edges_are_noops() {
        let mut ed = LineEditor::new();
        ed.backspace();
        ed.delete();
        ed.left();
        ed.right();
        assert!(ed.is_empty());
    }
}
