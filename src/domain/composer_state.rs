//! Draft of the chat message being composed.

pub const MAX_DRAFT_CHARS: usize = 2_000;

/// Editable draft with a cursor kept on a UTF-8 character boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerState {
    draft: String,
    cursor: usize,
}

impl ComposerState {
    pub fn text(&self) -> &str {
        &self.draft
    }

    pub fn has_text(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Cursor position counted in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.draft[..self.cursor].chars().count()
    }

    /// Returns false when the draft is already at its length limit.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.draft.chars().count() >= MAX_DRAFT_CHARS {
            return false;
        }

        self.draft.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        true
    }

    pub fn backspace(&mut self) -> bool {
        let Some(start) = self.previous_boundary() else {
            return false;
        };

        self.draft.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    pub fn delete(&mut self) -> bool {
        let Some(end) = self.next_boundary() else {
            return false;
        };

        self.draft.replace_range(self.cursor..end, "");
        true
    }

    pub fn move_left(&mut self) {
        if let Some(position) = self.previous_boundary() {
            self.cursor = position;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(position) = self.next_boundary() {
            self.cursor = position;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.draft.len();
    }

    /// Empties the composer and hands back what was typed.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.draft)
    }

    fn previous_boundary(&self) -> Option<usize> {
        self.draft[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(index, _)| index)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.draft[self.cursor..]
            .chars()
            .next()
            .map(|ch| self.cursor + ch.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> ComposerState {
        let mut composer = ComposerState::default();
        for ch in text.chars() {
            composer.insert(ch);
        }
        composer
    }

    #[test]
    fn inserts_at_cursor() {
        let mut composer = typed("hllo");
        composer.move_home();
        composer.move_right();

        composer.insert('e');

        assert_eq!(composer.text(), "hello");
        assert_eq!(composer.cursor_column(), 2);
    }

    #[test]
    fn backspace_and_delete_respect_multibyte_characters() {
        let mut composer = typed("añb");
        composer.move_left();

        assert!(composer.backspace());
        assert_eq!(composer.text(), "ab");

        composer.move_home();
        assert!(composer.delete());
        assert_eq!(composer.text(), "b");
        assert!(!composer.backspace());
    }

    #[test]
    fn delete_at_end_is_a_no_op() {
        let mut composer = typed("hi");

        assert!(!composer.delete());
        assert_eq!(composer.text(), "hi");
    }

    #[test]
    fn whitespace_only_draft_has_no_text() {
        assert!(!typed("   ").has_text());
        assert!(typed(" x ").has_text());
    }

    #[test]
    fn take_returns_draft_and_resets_cursor() {
        let mut composer = typed("hello");

        assert_eq!(composer.take(), "hello");
        assert_eq!(composer.text(), "");
        assert_eq!(composer.cursor_column(), 0);
    }

    #[test]
    fn refuses_input_beyond_limit() {
        let mut composer = ComposerState::default();
        for _ in 0..MAX_DRAFT_CHARS {
            assert!(composer.insert('x'));
        }

        assert!(!composer.insert('y'));
        composer.move_end();
        assert_eq!(composer.cursor_column(), MAX_DRAFT_CHARS);
    }
}
