use serde::{Deserialize, Serialize};

use super::SelectionRange;

/// Kind of transformation the writer asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    Rewrite,
    Expand,
    Shorten,
    Tone,
}

impl TransformMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformMode::Rewrite => "rewrite",
            TransformMode::Expand => "expand",
            TransformMode::Shorten => "shorten",
            TransformMode::Tone => "tone",
        }
    }
}

/// Everything the transform request needs, derived from the document at
/// request time.
///
/// When the selection is empty or whitespace-only, `selected_text` falls
/// back to the entire document while `from`/`to` keep the original
/// selection bounds, so `selected_text` does not always correspond to
/// `(from, to)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformPayload {
    pub action: TransformMode,
    pub selected_text: String,
    pub context_before: String,
    pub context_after: String,
    pub from: usize,
    pub to: usize,
    pub full_text: String,
}

/// One pending AI-proposed replacement for a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Text captured from the selection at request time.
    pub original: String,
    /// Replacement text returned by the service.
    pub suggestion: String,
    pub mode: TransformMode,
    /// Selection range at request time. Not re-validated against later
    /// edits.
    pub range: SelectionRange,
}

impl Suggestion {
    /// Display-only word delta between the suggestion and the original.
    /// Counts whitespace-delimited tokens; not used by any invariant.
    pub fn word_delta(&self) -> i64 {
        word_count(&self.suggestion) as i64 - word_count(&self.original) as i64
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
