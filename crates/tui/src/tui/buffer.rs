/// Single-line edit buffer backing one form field.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct FieldBuffer {
    text: String,
    cursor: usize,
}

impl FieldBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set<T: Into<String>>(&mut self, value: T) {
        self.text = value.into();
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let mut buf = [0u8; 4];
        let encoded = ch.encode_utf8(&mut buf);
        self.text.insert_str(self.cursor, encoded);
        self.cursor += encoded.len();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut iter = self.text[..self.cursor].char_indices().rev();
        if let Some((idx, _ch)) = iter.next() {
            self.text.drain(idx..self.cursor);
            self.cursor = idx;
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let mut iter = self.text[self.cursor..].char_indices();
        if let Some((idx, ch)) = iter.next() {
            let end = self.cursor + idx + ch.len_utf8();
            self.text.drain(self.cursor..end);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut iter = self.text[..self.cursor].char_indices().rev();
        if let Some((idx, _)) = iter.next() {
            self.cursor = idx;
        } else {
            self.cursor = 0;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let mut iter = self.text[self.cursor..].char_indices();
        if let Some((idx, ch)) = iter.next() {
            self.cursor += idx + ch.len_utf8();
        } else {
            self.cursor = self.text.len();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Cursor position in characters, for terminal cursor placement.
    pub fn cursor_col(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_places_cursor_at_end() {
        let mut buffer = FieldBuffer::new();
        buffer.set("hello");

        assert_eq!(buffer.as_str(), "hello");
        assert_eq!(buffer.cursor_col(), 5);
    }

    #[test]
    fn insert_ignores_line_breaks() {
        let mut buffer = FieldBuffer::new();
        buffer.insert_char('a');
        buffer.insert_char('\n');
        buffer.insert_char('\r');
        buffer.insert_char('b');

        assert_eq!(buffer.as_str(), "ab");
    }

    #[test]
    fn editing_respects_char_boundaries() {
        let mut buffer = FieldBuffer::new();
        buffer.set("héllo");

        buffer.move_home();
        buffer.move_right();
        buffer.delete_char();
        assert_eq!(buffer.as_str(), "hllo");

        buffer.insert_char('é');
        assert_eq!(buffer.as_str(), "héllo");
        assert_eq!(buffer.cursor_col(), 2);

        buffer.backspace();
        assert_eq!(buffer.as_str(), "hllo");
        assert_eq!(buffer.cursor_col(), 1);
    }

    #[test]
    fn home_and_end_jump_to_extremes() {
        let mut buffer = FieldBuffer::new();
        buffer.set("deadline");

        buffer.move_home();
        assert_eq!(buffer.cursor_col(), 0);

        buffer.move_end();
        assert_eq!(buffer.cursor_col(), 8);
    }
}
