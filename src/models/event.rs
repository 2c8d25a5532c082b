use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{EditorContext, SelectionRange};

/// Event-type tag carried by every editor event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    RequestStarted,
    RequestSucceeded,
    RequestFailed,
    SuggestionApplied,
    SuggestionDismissed,
    CommentStatusChanged,
}

/// Structured event handed to the [`EventSink`](crate::EventSink).
///
/// Fire-and-forget: emission failures are logged and swallowed, never
/// propagated back into the editing flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorEvent {
    pub kind: EventKind,
    pub session_id: Uuid,
    pub document_id: Uuid,
    /// Transform mode or persona id, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_length: Option<usize>,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl EditorEvent {
    pub fn new(kind: EventKind, ctx: &EditorContext) -> Self {
        Self {
            kind,
            session_id: ctx.session_id,
            document_id: ctx.document_id,
            tool: None,
            from: None,
            to: None,
            doc_length: None,
            payload: serde_json::Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub fn tool(mut self, tool: &str) -> Self {
        self.tool = Some(tool.to_string());
        self
    }

    pub fn range(mut self, range: SelectionRange) -> Self {
        self.from = Some(range.from);
        self.to = Some(range.to);
        self
    }

    pub fn doc_length(mut self, len: usize) -> Self {
        self.doc_length = Some(len);
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
