const ARABIC_COMMA: char = '\u{060C}';

/// Editable list of merchant keywords plus the text being typed.
///
/// Rules:
/// - `,` or `،` while typing commits the pending text as a chip
/// - duplicates are dropped silently, first occurrence wins
/// - Backspace with no pending text removes the last chip
/// - `←`/`→` highlight a chip; Backspace then removes that one
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordField {
    pub keywords: Vec<String>,
    pub pending: String,
    pub selected: Option<usize>,
}

impl KeywordField {
    /// Rebuilds the field from the wire encoding (comma-joined keywords).
    pub fn from_wire(raw: &str) -> Self {
        let mut field = Self::default();
        for piece in raw.split(',') {
            field.push_unique(piece);
        }
        field
    }

    /// Encodes the committed keywords back into the wire form.
    pub fn to_wire(&self) -> String {
        self.keywords.join(", ")
    }

    pub fn insert_char(&mut self, ch: char) {
        self.selected = None;
        if ch == ',' || ch == ARABIC_COMMA {
            self.commit_pending();
        } else {
            self.pending.push(ch);
        }
    }

    /// Commits the pending text as a chip. Empty or duplicate text is
    /// discarded without error; pending is cleared either way.
    pub fn commit_pending(&mut self) {
        self.selected = None;
        let pending = std::mem::take(&mut self.pending);
        self.push_unique(&pending);
    }

    pub fn backspace(&mut self) {
        if let Some(index) = self.selected {
            self.remove_at(index);
        } else if self.pending.pop().is_none() {
            self.keywords.pop();
        }
    }

    /// Moves the chip highlight one step left, entering from the text
    /// cursor onto the last chip.
    pub fn select_prev(&mut self) {
        self.selected = match self.selected {
            None if self.keywords.is_empty() => None,
            None => Some(self.keywords.len() - 1),
            Some(index) => Some(index.saturating_sub(1)),
        };
    }

    /// Moves the chip highlight one step right, leaving the last chip back
    /// onto the text cursor.
    pub fn select_next(&mut self) {
        self.selected = match self.selected {
            Some(index) if index + 1 < self.keywords.len() => Some(index + 1),
            _ => None,
        };
    }

    /// Splits pasted text on comma, Arabic comma, or newline and appends
    /// each new piece in order.
    pub fn paste(&mut self, text: &str) {
        self.selected = None;
        for piece in text.split([',', ARABIC_COMMA, '\n']) {
            self.push_unique(piece);
        }
    }

    /// Removes one chip without touching the others' order. The highlight
    /// stays on the chip that slides into the removed slot.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.keywords.len() {
            self.keywords.remove(index);
        }
        self.selected = match self.selected {
            Some(_) if self.keywords.is_empty() => None,
            Some(selected) => Some(selected.min(self.keywords.len() - 1)),
            None => None,
        };
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.pending.trim().is_empty()
    }

    fn push_unique(&mut self, piece: &str) {
        let trimmed = piece.trim();
        if !trimmed.is_empty() && !self.keywords.iter().any(|k| k == trimmed) {
            self.keywords.push(trimmed.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_commits_pending_text() {
        let mut field = KeywordField::default();
        for ch in "noon,amazon".chars() {
            field.insert_char(ch);
        }
        field.commit_pending();
        assert_eq!(field.keywords, vec!["noon", "amazon"]);
        assert!(field.pending.is_empty());
    }

    #[test]
    fn arabic_comma_commits_pending_text() {
        let mut field = KeywordField::default();
        for ch in "نون،امازون".chars() {
            field.insert_char(ch);
        }
        field.commit_pending();
        assert_eq!(field.keywords, vec!["نون", "امازون"]);
    }

    #[test]
    fn commit_trims_and_drops_empty() {
        let mut field = KeywordField::default();
        field.pending = "  coffee  ".to_string();
        field.commit_pending();
        field.pending = "   ".to_string();
        field.commit_pending();
        assert_eq!(field.keywords, vec!["coffee"]);
        assert!(field.pending.is_empty());
    }

    #[test]
    fn duplicate_commit_is_silent_noop() {
        let mut field = KeywordField::default();
        field.pending = "noon".to_string();
        field.commit_pending();
        field.pending = "noon".to_string();
        field.commit_pending();
        assert_eq!(field.keywords, vec!["noon"]);
        assert!(field.pending.is_empty());
    }

    #[test]
    fn backspace_edits_pending_before_chips() {
        let mut field = KeywordField::default();
        field.keywords = vec!["a".to_string(), "b".to_string()];
        field.pending = "cd".to_string();
        field.backspace();
        assert_eq!(field.pending, "c");
        assert_eq!(field.keywords.len(), 2);
    }

    #[test]
    fn backspace_on_empty_pending_pops_last_chip() {
        let mut field = KeywordField::default();
        field.keywords = vec!["a".to_string(), "b".to_string()];
        field.backspace();
        assert_eq!(field.keywords, vec!["a"]);
        field.backspace();
        assert!(field.keywords.is_empty());
        field.backspace();
        assert!(field.keywords.is_empty());
    }

    #[test]
    fn paste_splits_trims_and_dedups_in_order() {
        let mut field = KeywordField::default();
        field.keywords = vec!["noon".to_string()];
        field.paste(" amazon , noon ،careem\nextra,, amazon ");
        assert_eq!(field.keywords, vec!["noon", "amazon", "careem", "extra"]);
    }

    #[test]
    fn paste_handles_crlf() {
        let mut field = KeywordField::default();
        field.paste("one\r\ntwo\r\n");
        assert_eq!(field.keywords, vec!["one", "two"]);
    }

    #[test]
    fn remove_at_keeps_remaining_order() {
        let mut field = KeywordField::from_wire("a, b, c");
        field.remove_at(1);
        assert_eq!(field.keywords, vec!["a", "c"]);
        field.remove_at(9);
        assert_eq!(field.keywords, vec!["a", "c"]);
    }

    #[test]
    fn arrows_walk_chip_selection() {
        let mut field = KeywordField::from_wire("a, b, c");
        assert_eq!(field.selected, None);
        field.select_prev();
        assert_eq!(field.selected, Some(2));
        field.select_prev();
        assert_eq!(field.selected, Some(1));
        field.select_next();
        field.select_next();
        assert_eq!(field.selected, None);
    }

    #[test]
    fn backspace_removes_highlighted_chip() {
        let mut field = KeywordField::from_wire("a, b, c");
        field.select_prev();
        field.select_prev();
        field.backspace();
        assert_eq!(field.keywords, vec!["a", "c"]);
        assert_eq!(field.selected, Some(1));
        field.backspace();
        assert_eq!(field.keywords, vec!["a"]);
        assert_eq!(field.selected, Some(0));
        field.backspace();
        assert!(field.keywords.is_empty());
        assert_eq!(field.selected, None);
    }

    #[test]
    fn typing_drops_chip_selection() {
        let mut field = KeywordField::from_wire("a, b");
        field.select_prev();
        field.insert_char('x');
        assert_eq!(field.selected, None);
        assert_eq!(field.pending, "x");
    }

    #[test]
    fn wire_round_trip() {
        let field = KeywordField::from_wire("noon, amazon ,noon,");
        assert_eq!(field.keywords, vec!["noon", "amazon"]);
        assert_eq!(field.to_wire(), "noon, amazon");
    }

    #[test]
    fn is_empty_considers_pending_text() {
        let mut field = KeywordField::default();
        assert!(field.is_empty());
        field.pending = "noon".to_string();
        assert!(!field.is_empty());
        field.commit_pending();
        assert!(!field.is_empty());
    }
}
