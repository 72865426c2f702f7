//! Single-line text buffer behind the chip input's search field.
//!
//! Tracks characters and a cursor (char index). Every mutating method
//! returns whether the text changed, so the caller knows when to emit a
//! change notification.

/// Single-line editable text with a cursor.
#[derive(Debug, Clone, Default)]
pub struct TextEditState {
    chars: Vec<char>,
    cursor: usize,
}

impl TextEditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current value as a String.
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replace the value and move the cursor to the end.
    pub fn set_value(&mut self, s: &str) {
        self.chars = s.chars().collect();
        self.cursor = self.chars.len();
    }

    /// Empty the buffer. Returns true if there was anything to clear.
    pub fn clear(&mut self) -> bool {
        let changed = !self.chars.is_empty();
        self.chars.clear();
        self.cursor = 0;
        changed
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Current cursor position (char index, 0-based).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        true
    }

    /// Insert at the cursor. Line breaks become spaces since the field is a
    /// single line.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let before = self.chars.len();
        for c in s.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            if c.is_control() {
                continue;
            }
            self.chars.insert(self.cursor, c);
            self.cursor += 1;
        }
        self.chars.len() != before
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_back(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
            true
        } else {
            false
        }
    }

    /// Delete the character under the cursor (delete key).
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
            true
        } else {
            false
        }
    }

    /// Delete the word before the cursor (Ctrl+W / Alt+Backspace).
    pub fn delete_word_back(&mut self) -> bool {
        let start = self.cursor;
        while self.cursor > 0 && self.chars[self.cursor - 1] == ' ' {
            self.cursor -= 1;
        }
        while self.cursor > 0 && self.chars[self.cursor - 1] != ' ' {
            self.cursor -= 1;
        }
        self.chars.drain(self.cursor..start);
        self.cursor != start
    }

    /// Delete from the start of the line to the cursor (Ctrl+U).
    pub fn delete_to_start(&mut self) -> bool {
        let removed = self.chars.drain(..self.cursor).count();
        self.cursor = 0;
        removed > 0
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> TextEditState {
        let mut state = TextEditState::new();
        for c in s.chars() {
            state.insert_char(c);
        }
        state
    }

    #[test]
    fn insert_and_value() {
        let state = typed("Terr");
        assert_eq!(state.value(), "Terr");
        assert_eq!(state.cursor(), 4);
    }

    #[test]
    fn delete_back_at_start_is_noop() {
        let mut state = typed("ab");
        state.move_home();
        assert!(!state.delete_back());
        assert_eq!(state.value(), "ab");
    }

    #[test]
    fn delete_back_and_forward() {
        let mut state = typed("abc");
        assert!(state.delete_back());
        state.move_home();
        assert!(state.delete_forward());
        assert_eq!(state.value(), "b");
        state.move_end();
        assert!(!state.delete_forward());
    }

    #[test]
    fn insert_in_middle() {
        let mut state = typed("Mles");
        state.move_home();
        state.move_right();
        state.insert_char('i');
        assert_eq!(state.value(), "Miles");
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn delete_word_back_skips_trailing_spaces() {
        let mut state = typed("Gust Josh  ");
        assert!(state.delete_word_back());
        assert_eq!(state.value(), "Gust ");
        assert!(state.delete_word_back());
        assert_eq!(state.value(), "");
        assert!(!state.delete_word_back());
    }

    #[test]
    fn delete_to_start_keeps_tail() {
        let mut state = typed("Marcel Wane");
        state.set_value("Marcel Wane");
        for _ in 0..4 {
            state.move_left();
        }
        assert!(state.delete_to_start());
        assert_eq!(state.value(), "Wane");
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut state = TextEditState::new();
        assert!(state.insert_str("Arely\nSim\t"));
        assert_eq!(state.value(), "Arely Sim");
        assert!(!state.insert_str("\u{7}"));
    }

    #[test]
    fn clear_reports_change() {
        let mut state = typed("x");
        assert!(state.clear());
        assert!(!state.clear());
        assert_eq!(state.cursor(), 0);
    }
}
