use serde::{Deserialize, Serialize};

use crate::models::SelectionRange;

/// Who wrote a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authorship {
    Human,
    Ai,
}

/// Provenance tag over a range. Whether the tag is later removed or kept
/// is the host's display policy; the core only attaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceSpan {
    pub range: SelectionRange,
    pub authorship: Authorship,
}

/// The document surface the controllers edit through.
///
/// Offsets are character offsets. Implementations clamp out-of-range
/// requests instead of failing, the way a text buffer slices; a stale
/// range therefore lands on whatever text is at those offsets now.
pub trait DocumentModel {
    /// Total length in characters.
    fn char_len(&self) -> usize;

    fn full_text(&self) -> String;

    fn selection(&self) -> SelectionRange;

    fn set_selection(&mut self, range: SelectionRange);

    /// Text inside `range`, clamped to the document.
    fn text_in(&self, range: SelectionRange) -> String;

    /// Replace `range` with `replacement`.
    fn replace_range(&mut self, range: SelectionRange, replacement: &str);

    /// Tag `range` with an authorship mark.
    fn mark_range(&mut self, range: SelectionRange, authorship: Authorship);
}

/// In-memory document: a string buffer with a selection and a list of
/// provenance spans. Enough for headless hosts and for tests; a rich
/// editor surface implements [`DocumentModel`] over its own buffer.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    text: String,
    selection: SelectionRange,
    marks: Vec<ProvenanceSpan>,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: SelectionRange::caret(0),
            marks: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn marks(&self) -> &[ProvenanceSpan] {
        &self.marks
    }

    fn byte_at(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(index, _)| index)
            .unwrap_or(self.text.len())
    }

    fn clamped(&self, range: SelectionRange) -> SelectionRange {
        let len = self.char_len();
        SelectionRange::new(range.from.min(len), range.to.min(len))
    }
}

impl DocumentModel for TextDocument {
    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn full_text(&self) -> String {
        self.text.clone()
    }

    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn set_selection(&mut self, range: SelectionRange) {
        self.selection = self.clamped(range);
    }

    fn text_in(&self, range: SelectionRange) -> String {
        let range = self.clamped(range);
        self.text[self.byte_at(range.from)..self.byte_at(range.to)].to_string()
    }

    fn replace_range(&mut self, range: SelectionRange, replacement: &str) {
        let range = self.clamped(range);
        let start = self.byte_at(range.from);
        let end = self.byte_at(range.to);
        self.text.replace_range(start..end, replacement);

        // Collapse the selection to the end of the replacement.
        self.selection = SelectionRange::caret(range.from + replacement.chars().count());
    }

    fn mark_range(&mut self, range: SelectionRange, authorship: Authorship) {
        self.marks.push(ProvenanceSpan { range, authorship });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_uses_char_offsets() {
        let mut doc = TextDocument::new("héllo wörld");
        doc.replace_range(SelectionRange::new(6, 11), "earth");
        assert_eq!(doc.text(), "héllo earth");
        assert_eq!(doc.char_len(), 11);
        assert_eq!(doc.selection(), SelectionRange::caret(11));
    }

    #[test]
    fn out_of_range_requests_are_clamped() {
        let mut doc = TextDocument::new("short");
        assert_eq!(doc.text_in(SelectionRange::new(3, 99)), "rt");

        doc.replace_range(SelectionRange::new(99, 120), "!");
        assert_eq!(doc.text(), "short!");
    }

    #[test]
    fn marks_accumulate() {
        let mut doc = TextDocument::new("abcdef");
        doc.mark_range(SelectionRange::new(0, 3), Authorship::Ai);
        doc.mark_range(SelectionRange::new(3, 6), Authorship::Human);

        assert_eq!(doc.marks().len(), 2);
        assert_eq!(doc.marks()[0].authorship, Authorship::Ai);
    }

    #[test]
    fn selection_is_clamped_to_length() {
        let mut doc = TextDocument::new("abc");
        doc.set_selection(SelectionRange::new(1, 50));
        assert_eq!(doc.selection(), SelectionRange::new(1, 3));
    }
}
