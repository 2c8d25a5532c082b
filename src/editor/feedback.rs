use std::sync::Arc;

use serde_json::json;

use super::document::DocumentModel;
use crate::error::EditorError;
use crate::models::{
    CommentStatus, EditorContext, EditorEvent, EventKind, FeedbackPayload, Persona,
    PersonaComment, RawComment, SelectionRange,
};
use crate::services::{emit, EventSink, ServiceReply, TextService};

/// Ticket for one in-flight feedback request.
#[derive(Debug, Clone)]
pub struct PendingFeedback {
    pub payload: FeedbackPayload,
    persona: Persona,
    range: SelectionRange,
    generation: u64,
}

impl PendingFeedback {
    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn range(&self) -> SelectionRange {
        self.range
    }
}

/// Owns the persona-feedback lifecycle: request → open comments →
/// resolved/hidden.
///
/// Comments persist across requests; new batches append. There is no
/// in-flight guard, so two overlapping requests for the same persona may
/// both land and append duplicate batches. Ids stay unique regardless
/// because they are scoped by persona, request generation, and index
/// within the batch.
pub struct PersonaFeedbackController {
    ctx: EditorContext,
    sink: Arc<dyn EventSink>,
    comments: Vec<PersonaComment>,
    remembered_range: Option<SelectionRange>,
    generation: u64,
}

impl PersonaFeedbackController {
    pub fn new(ctx: EditorContext, sink: Arc<dyn EventSink>) -> Self {
        Self {
            ctx,
            sink,
            comments: Vec::new(),
            remembered_range: None,
            generation: 0,
        }
    }

    /// All comments ever received, hidden ones included.
    pub fn comments(&self) -> &[PersonaComment] {
        &self.comments
    }

    /// Comments the margin UI should render.
    pub fn visible_comments(&self) -> impl Iterator<Item = &PersonaComment> {
        self.comments
            .iter()
            .filter(|c| c.status != CommentStatus::Hidden)
    }

    pub fn open_count(&self) -> usize {
        self.comments
            .iter()
            .filter(|c| c.status == CommentStatus::Open)
            .count()
    }

    /// The range captured by the most recent feedback request; shared by
    /// every comment from that batch.
    pub fn remembered_range(&self) -> Option<SelectionRange> {
        self.remembered_range
    }

    /// Resolve the passage to critique and start a feedback request.
    ///
    /// An empty or whitespace-only selection falls back to the entire
    /// document with a range of `(1, doc_len)`. The lower bound starts at
    /// 1, not 0; comment-excerpt highlighting depends on it matching the
    /// document's own offset convention for the full-text case.
    pub fn begin_feedback<D>(
        &mut self,
        doc: Option<&D>,
        persona: Persona,
    ) -> Result<PendingFeedback, EditorError>
    where
        D: DocumentModel + ?Sized,
    {
        let doc = doc.ok_or(EditorError::NotReady)?;

        let selection = doc.selection();
        let mut text = doc.text_in(selection);
        let mut range = selection;
        if text.trim().is_empty() {
            text = doc.full_text();
            range = SelectionRange::new(1, doc.char_len());
        }

        if text.trim().is_empty() {
            return Err(EditorError::EmptyInput);
        }

        // Remembered before sending, so an excerpt click can re-select it
        // even while the request is still in flight.
        self.remembered_range = Some(range);
        self.generation += 1;

        emit(
            self.sink.as_ref(),
            EditorEvent::new(EventKind::RequestStarted, &self.ctx)
                .tool(persona.id())
                .range(range)
                .doc_length(doc.char_len()),
        );

        Ok(PendingFeedback {
            payload: FeedbackPayload { persona, text },
            persona,
            range,
            generation: self.generation,
        })
    }

    /// Feed the service reply back: normalize and append the batch.
    ///
    /// Returns how many comments were appended. A malformed reply counts
    /// as zero comments, not an error; a service error appends nothing.
    pub fn resolve(
        &mut self,
        pending: PendingFeedback,
        reply: ServiceReply<Vec<RawComment>>,
    ) -> Result<usize, EditorError> {
        match reply {
            ServiceReply::Ok(batch) => {
                let appended = batch.len();
                for (index, raw) in batch.into_iter().enumerate() {
                    self.comments.push(normalize(raw, &pending, index));
                }

                emit(
                    self.sink.as_ref(),
                    EditorEvent::new(EventKind::RequestSucceeded, &self.ctx)
                        .tool(pending.persona.id())
                        .payload(json!({ "commentCount": appended })),
                );

                Ok(appended)
            }
            ServiceReply::Malformed { detail } => {
                tracing::warn!(
                    persona = pending.persona.id(),
                    detail = %detail,
                    "feedback response was not a comment array; treating as empty"
                );
                emit(
                    self.sink.as_ref(),
                    EditorEvent::new(EventKind::RequestSucceeded, &self.ctx)
                        .tool(pending.persona.id())
                        .payload(json!({ "commentCount": 0 })),
                );
                Ok(0)
            }
            ServiceReply::Error { status, body } => {
                tracing::warn!(
                    persona = pending.persona.id(),
                    status,
                    "feedback request failed"
                );
                emit(
                    self.sink.as_ref(),
                    EditorEvent::new(EventKind::RequestFailed, &self.ctx)
                        .tool(pending.persona.id())
                        .payload(json!({ "status": status })),
                );
                Err(EditorError::service(status, &body))
            }
        }
    }

    /// One-shot feedback request; the service call is the only suspension
    /// point.
    pub async fn request_feedback<D, S>(
        &mut self,
        doc: Option<&D>,
        persona: Persona,
        service: &S,
    ) -> Result<usize, EditorError>
    where
        D: DocumentModel + ?Sized,
        S: TextService + ?Sized,
    {
        let pending = self.begin_feedback(doc, persona)?;
        let reply = service.feedback(&pending.payload).await;
        self.resolve(pending, reply)
    }

    /// Mark a comment resolved. Only `open → resolved` is allowed;
    /// anything else is a no-op. Returns whether a transition happened.
    pub fn resolve_comment(&mut self, id: &str) -> bool {
        let Some(comment) = self.comments.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if comment.status != CommentStatus::Open {
            return false;
        }
        comment.status = CommentStatus::Resolved;

        let persona = comment.persona;
        emit(
            self.sink.as_ref(),
            EditorEvent::new(EventKind::CommentStatusChanged, &self.ctx)
                .tool(persona.id())
                .payload(json!({ "id": id, "status": "resolved" })),
        );
        true
    }

    /// Hide a comment. Reachable from any status and terminal; the record
    /// is retained, never deleted.
    pub fn hide_comment(&mut self, id: &str) -> bool {
        let Some(comment) = self.comments.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if comment.status == CommentStatus::Hidden {
            return false;
        }
        comment.status = CommentStatus::Hidden;

        let persona = comment.persona;
        emit(
            self.sink.as_ref(),
            EditorEvent::new(EventKind::CommentStatusChanged, &self.ctx)
                .tool(persona.id())
                .payload(json!({ "id": id, "status": "hidden" })),
        );
        true
    }

    /// Re-select the range remembered at request time. Clicking any
    /// comment from a batch reproduces the same highlighted range, since
    /// the range is per-batch, not per-comment. No-op without one.
    pub fn excerpt_click<D>(&self, doc: &mut D) -> bool
    where
        D: DocumentModel + ?Sized,
    {
        match self.remembered_range {
            Some(range) => {
                doc.set_selection(range);
                true
            }
            None => false,
        }
    }
}

/// Normalize one wire comment: missing fields default to empty strings,
/// a missing id gets a request-scoped one, status starts open.
fn normalize(raw: RawComment, pending: &PendingFeedback, index: usize) -> PersonaComment {
    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("{}-{}-{}", pending.persona.id(), pending.generation, index));

    PersonaComment {
        id,
        persona: pending.persona,
        excerpt: raw.excerpt.unwrap_or_default(),
        comment: raw.comment.unwrap_or_default(),
        suggestion: raw.suggestion.unwrap_or_default(),
        status: CommentStatus::Open,
    }
}
