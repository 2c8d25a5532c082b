use regex::Regex;

use super::document::DocumentModel;
use crate::models::{TransformMode, TransformPayload};

/// Derives a transform payload from the current document state.
pub struct TransformRequestBuilder;

impl TransformRequestBuilder {
    /// Returns `None` when no document is attached ("not ready");
    /// callers must check before issuing any request.
    ///
    /// An empty or whitespace-only selection swaps the entire document in
    /// as `selected_text`; `from`/`to` keep the original selection bounds
    /// either way.
    pub fn build<D>(doc: Option<&D>, action: TransformMode) -> Option<TransformPayload>
    where
        D: DocumentModel + ?Sized,
    {
        let doc = doc?;
        let selection = doc.selection();
        let full_text = doc.full_text();

        let mut selected_text = doc.text_in(selection);
        if selected_text.trim().is_empty() {
            selected_text = full_text.clone();
        }

        let (context_before, context_after) = paragraph_context(&full_text, selected_text.trim());

        Some(TransformPayload {
            action,
            selected_text,
            context_before,
            context_after,
            from: selection.from,
            to: selection.to,
            full_text,
        })
    }
}

/// Adjacent paragraphs around the first paragraph containing `needle`.
///
/// Containment, not equality: a selection spanning paragraphs or repeated
/// verbatim elsewhere picks whichever paragraph matches first.
fn paragraph_context(full_text: &str, needle: &str) -> (String, String) {
    if needle.is_empty() {
        return (String::new(), String::new());
    }

    let blank_lines = Regex::new(r"\n\s*\n").unwrap();
    let paragraphs: Vec<&str> = blank_lines.split(full_text).collect();

    let index = match paragraphs.iter().position(|p| p.contains(needle)) {
        Some(index) => index,
        None => return (String::new(), String::new()),
    };

    let before = if index > 0 {
        paragraphs[index - 1].trim().to_string()
    } else {
        String::new()
    };
    let after = paragraphs
        .get(index + 1)
        .map(|p| p.trim().to_string())
        .unwrap_or_default();

    (before, after)
}
