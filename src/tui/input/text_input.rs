//! Text input field handling.

use unicode_width::UnicodeWidthStr;

/// State for a text input field.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    /// The current text content.
    pub content: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl TextInput {
    /// Creates a new empty text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an input prefilled with `content`, cursor at the end.
    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.chars().count();
        Self { content, cursor }
    }

    /// Byte offset of the character at `index`.
    fn byte_index(&self, index: usize) -> usize {
        self.content
            .char_indices()
            .nth(index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Deletes the character at the cursor position (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Moves the cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the beginning.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Takes the content and resets the input.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Returns the current content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Display width of the text before the cursor, in terminal cells.
    pub fn cursor_width(&self) -> usize {
        self.content[..self.byte_index(self.cursor)].width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = TextInput::with_content("15");
        input.move_left();
        input.insert('.');
        assert_eq!(input.as_str(), "1.5");

        input.move_end();
        input.backspace();
        assert_eq!(input.as_str(), "1.");

        input.move_home();
        input.delete();
        assert_eq!(input.as_str(), ".");
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut input = TextInput::with_content("₿1");
        assert_eq!(input.cursor, 2);
        input.move_left();
        input.backspace();
        assert_eq!(input.as_str(), "1");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn take_resets() {
        let mut input = TextInput::with_content("0.25");
        assert_eq!(input.take(), "0.25");
        assert_eq!(input.as_str(), "");
        assert_eq!(input.cursor, 0);
        assert_eq!(input.cursor_width(), 0);
    }
}
