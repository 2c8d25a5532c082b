use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use super::attribution::AttributionLedger;
use super::document::{Authorship, DocumentModel};
use super::request_builder::TransformRequestBuilder;
use crate::error::EditorError;
use crate::models::{
    EditorContext, EditorEvent, EventKind, SelectionRange, Suggestion, TransformMode,
    TransformPayload,
};
use crate::services::{emit, EventSink, ServiceReply, TextService};

/// Where the pending-suggestion machine currently is.
///
/// `idle → requesting → reviewing → idle` on apply/dismiss; any failure
/// drops straight back to `idle`. A fresh request is allowed even from
/// `reviewing` and silently discards the suggestion under review.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SuggestionState {
    #[default]
    Idle,
    Requesting {
        mode: TransformMode,
    },
    Reviewing(Suggestion),
}

/// Ticket for one in-flight transform request. Hand it back to
/// [`SuggestionController::resolve`] with the service reply.
#[derive(Debug, Clone)]
pub struct PendingTransform {
    pub payload: TransformPayload,
    generation: u64,
}

impl PendingTransform {
    pub fn mode(&self) -> TransformMode {
        self.payload.action
    }
}

/// Summary of an applied suggestion, mirrored into the "applied" event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedSuggestion {
    pub mode: TransformMode,
    pub original_chars: usize,
    pub suggestion_chars: usize,
    /// Display-only whitespace-token delta.
    pub word_delta: i64,
    /// Where the replacement now sits in the document.
    pub inserted_range: SelectionRange,
}

/// Owns the pending-suggestion state machine.
///
/// At most one suggestion is pending at any time; issuing a new request
/// while one is under review discards it, last-request-wins. The
/// generation counter keeps a stale service reply from being applied over
/// a newer request: no cancellation signal is sent, the late reply is
/// simply ignored.
pub struct SuggestionController {
    ctx: EditorContext,
    sink: Arc<dyn EventSink>,
    state: SuggestionState,
    generation: u64,
}

impl SuggestionController {
    pub fn new(ctx: EditorContext, sink: Arc<dyn EventSink>) -> Self {
        Self {
            ctx,
            sink,
            state: SuggestionState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// The suggestion under review, if any.
    pub fn suggestion(&self) -> Option<&Suggestion> {
        match &self.state {
            SuggestionState::Reviewing(suggestion) => Some(suggestion),
            _ => None,
        }
    }

    /// Start a transform request: build the payload, discard any
    /// suggestion under review, enter `requesting`.
    ///
    /// No network traffic happens here; callers pass the payload to the
    /// text service and feed the reply to [`resolve`](Self::resolve).
    pub fn begin_request<D>(
        &mut self,
        doc: Option<&D>,
        mode: TransformMode,
    ) -> Result<PendingTransform, EditorError>
    where
        D: DocumentModel + ?Sized,
    {
        let payload = match TransformRequestBuilder::build(doc, mode) {
            Some(payload) => payload,
            None => {
                self.state = SuggestionState::Idle;
                return Err(EditorError::NotReady);
            }
        };

        self.generation += 1;
        self.state = SuggestionState::Requesting { mode };

        emit(
            self.sink.as_ref(),
            EditorEvent::new(EventKind::RequestStarted, &self.ctx)
                .tool(mode.as_str())
                .range(SelectionRange::new(payload.from, payload.to))
                .doc_length(payload.full_text.chars().count()),
        );

        Ok(PendingTransform {
            payload,
            generation: self.generation,
        })
    }

    /// Feed a service reply back into the machine.
    ///
    /// A reply whose generation no longer matches belongs to a request
    /// that was superseded while in flight; it is ignored and `Ok(None)`
    /// is returned with the state untouched.
    pub fn resolve(
        &mut self,
        pending: PendingTransform,
        reply: ServiceReply<String>,
    ) -> Result<Option<&Suggestion>, EditorError> {
        if pending.generation != self.generation {
            return Ok(None);
        }

        match reply {
            ServiceReply::Ok(text) => {
                let suggestion = Suggestion {
                    original: pending.payload.selected_text,
                    suggestion: text,
                    mode: pending.payload.action,
                    range: SelectionRange::new(pending.payload.from, pending.payload.to),
                };

                emit(
                    self.sink.as_ref(),
                    EditorEvent::new(EventKind::RequestSucceeded, &self.ctx)
                        .tool(suggestion.mode.as_str())
                        .payload(json!({
                            "suggestionChars": suggestion.suggestion.chars().count(),
                        })),
                );

                self.state = SuggestionState::Reviewing(suggestion);
                Ok(self.suggestion())
            }
            ServiceReply::Malformed { detail } => {
                self.fail_request(pending.mode(), None, &detail);
                Err(EditorError::service(None, &detail))
            }
            ServiceReply::Error { status, body } => {
                self.fail_request(pending.mode(), status, &body);
                Err(EditorError::service(status, &body))
            }
        }
    }

    fn fail_request(&mut self, mode: TransformMode, status: Option<u16>, detail: &str) {
        self.state = SuggestionState::Idle;
        tracing::warn!(mode = mode.as_str(), status, detail, "transform request failed");
        emit(
            self.sink.as_ref(),
            EditorEvent::new(EventKind::RequestFailed, &self.ctx)
                .tool(mode.as_str())
                .payload(json!({ "status": status })),
        );
    }

    /// One-shot request: build, call the service, resolve. The service
    /// call is the only suspension point.
    pub async fn request<D, S>(
        &mut self,
        doc: Option<&D>,
        mode: TransformMode,
        service: &S,
    ) -> Result<Option<&Suggestion>, EditorError>
    where
        D: DocumentModel + ?Sized,
        S: TextService + ?Sized,
    {
        let pending = self.begin_request(doc, mode)?;
        let reply = service.transform(&pending.payload).await;
        self.resolve(pending, reply)
    }

    /// Replace the captured range with the suggestion, tag the inserted
    /// span as AI-authored, and reconcile the ledger. Synchronous
    /// throughout, so no intermediate state is observable.
    pub fn apply<D>(
        &mut self,
        doc: &mut D,
        ledger: &mut AttributionLedger,
    ) -> Result<AppliedSuggestion, EditorError>
    where
        D: DocumentModel + ?Sized,
    {
        let suggestion = match std::mem::take(&mut self.state) {
            SuggestionState::Reviewing(suggestion) => suggestion,
            other => {
                self.state = other;
                return Err(EditorError::NoSuggestion);
            }
        };

        let word_delta = suggestion.word_delta();
        let original_chars = suggestion.original.chars().count();
        let suggestion_chars = suggestion.suggestion.chars().count();

        doc.replace_range(suggestion.range, &suggestion.suggestion);
        let inserted_range =
            SelectionRange::new(suggestion.range.from, suggestion.range.from + suggestion_chars);
        doc.mark_range(inserted_range, Authorship::Ai);
        ledger.on_suggestion_applied(suggestion_chars, doc.char_len());

        emit(
            self.sink.as_ref(),
            EditorEvent::new(EventKind::SuggestionApplied, &self.ctx)
                .tool(suggestion.mode.as_str())
                .range(inserted_range)
                .doc_length(doc.char_len())
                .payload(json!({
                    "originalChars": original_chars,
                    "suggestionChars": suggestion_chars,
                    "wordDelta": word_delta,
                })),
        );

        Ok(AppliedSuggestion {
            mode: suggestion.mode,
            original_chars,
            suggestion_chars,
            word_delta,
            inserted_range,
        })
    }

    /// Drop the suggestion under review. Ledger and document untouched.
    pub fn dismiss(&mut self) -> Result<(), EditorError> {
        match std::mem::take(&mut self.state) {
            SuggestionState::Reviewing(suggestion) => {
                emit(
                    self.sink.as_ref(),
                    EditorEvent::new(EventKind::SuggestionDismissed, &self.ctx)
                        .tool(suggestion.mode.as_str())
                        .payload(json!({
                            "originalChars": suggestion.original.chars().count(),
                            "suggestionChars": suggestion.suggestion.chars().count(),
                        })),
                );
                Ok(())
            }
            other => {
                self.state = other;
                Err(EditorError::NoSuggestion)
            }
        }
    }
}
