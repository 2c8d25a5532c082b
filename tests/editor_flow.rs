//! End-to-end lifecycle: transform request → review → apply, persona
//! feedback → comment triage, with attribution and telemetry observed
//! through a scripted backend and a recording sink.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use marginalia::{
    AttributionLedger, CommentStatus, DocumentModel, EditorContext, EditorEvent, EventKind,
    EventSink, FeedbackPayload, Persona, PersonaFeedbackController, RawComment, SelectionRange,
    ServiceReply, SuggestionController, SuggestionState, TextDocument, TextService, TransformMode,
    TransformPayload,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Backend stub that pops scripted replies in order.
struct ScriptedService {
    transforms: Mutex<VecDeque<ServiceReply<String>>>,
    feedbacks: Mutex<VecDeque<ServiceReply<Vec<RawComment>>>>,
}

impl ScriptedService {
    fn new() -> Self {
        Self {
            transforms: Mutex::new(VecDeque::new()),
            feedbacks: Mutex::new(VecDeque::new()),
        }
    }

    fn push_transform(&self, reply: ServiceReply<String>) {
        self.transforms.lock().unwrap().push_back(reply);
    }

    fn push_feedback(&self, reply: ServiceReply<Vec<RawComment>>) {
        self.feedbacks.lock().unwrap().push_back(reply);
    }
}

#[async_trait]
impl TextService for ScriptedService {
    async fn transform(&self, _request: &TransformPayload) -> ServiceReply<String> {
        self.transforms
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ServiceReply::Error {
                status: None,
                body: "script exhausted".to_string(),
            })
    }

    async fn feedback(&self, _request: &FeedbackPayload) -> ServiceReply<Vec<RawComment>> {
        self.feedbacks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ServiceReply::Error {
                status: None,
                body: "script exhausted".to_string(),
            })
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<EditorEvent>>,
}

impl RecordingSink {
    fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind).collect()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: EditorEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

const DRAFT: &str = "Para one.\n\nPara two.\n\nPara three.";

#[test]
fn transform_lifecycle_updates_document_and_ledger() {
    init_tracing();
    let sink = Arc::new(RecordingSink::default());
    let ctx = EditorContext::new(Uuid::new_v4());
    let mut controller = SuggestionController::new(ctx, sink.clone());
    let mut ledger = AttributionLedger::new();

    let mut doc = TextDocument::new(DRAFT);
    ledger.on_document_changed(doc.char_len());
    doc.set_selection(SelectionRange::new(11, 20)); // "Para two."

    // The builder picks up the neighboring paragraphs as context.
    let pending = controller
        .begin_request(Some(&doc), TransformMode::Rewrite)
        .unwrap();
    assert_eq!(pending.payload.selected_text, "Para two.");
    assert_eq!(pending.payload.context_before, "Para one.");
    assert_eq!(pending.payload.context_after, "Para three.");

    let replacement = "A second paragraph, rewritten.";
    controller
        .resolve(pending, ServiceReply::Ok(replacement.to_string()))
        .unwrap();
    let suggestion = controller.suggestion().unwrap();
    assert_eq!(suggestion.original, "Para two.");
    assert_eq!(suggestion.word_delta(), 2);

    let applied = controller.apply(&mut doc, &mut ledger).unwrap();

    assert_eq!(
        doc.text(),
        "Para one.\n\nA second paragraph, rewritten.\n\nPara three."
    );
    assert_eq!(applied.suggestion_chars, 30);
    assert_eq!(ledger.ai_chars(), 30);
    assert_eq!(ledger.human_chars(), doc.char_len() - 30);
    assert_eq!(controller.state(), &SuggestionState::Idle);

    let breakdown = ledger.percentages();
    assert_eq!(breakdown.ai_percent + breakdown.human_percent, 100);

    // Typing afterwards reconciles through the document-change path.
    ledger.on_document_changed(doc.char_len() + 12);
    assert_eq!(ledger.ai_chars(), 30);
    assert_eq!(ledger.human_chars() + ledger.ai_chars(), doc.char_len() + 12);

    assert_eq!(
        sink.kinds(),
        vec![
            EventKind::RequestStarted,
            EventKind::RequestSucceeded,
            EventKind::SuggestionApplied,
        ]
    );
}

#[tokio::test]
async fn feedback_lifecycle_appends_and_triages_comments() {
    init_tracing();
    let sink = Arc::new(RecordingSink::default());
    let ctx = EditorContext::new(Uuid::new_v4());
    let mut controller = PersonaFeedbackController::new(ctx, sink.clone());
    let service = ScriptedService::new();

    let mut doc = TextDocument::new("x".repeat(40));
    doc.set_selection(SelectionRange::caret(5));

    service.push_feedback(ServiceReply::Ok(vec![
        RawComment {
            id: Some("c-1".to_string()),
            excerpt: Some("xxxx".to_string()),
            comment: Some("repetitive".to_string()),
            suggestion: Some("vary the letters".to_string()),
        },
        RawComment::default(),
    ]));

    let appended = controller
        .request_feedback(Some(&doc), Persona::RuthlessEditor, &service)
        .await
        .unwrap();
    assert_eq!(appended, 2);

    // Empty selection fell back to the whole document, range (1, 40).
    assert_eq!(
        controller.remembered_range(),
        Some(SelectionRange::new(1, 40))
    );

    // A malformed follow-up degrades to zero comments, not an error.
    service.push_feedback(ServiceReply::Malformed {
        detail: "not an array".to_string(),
    });
    let appended = controller
        .request_feedback(Some(&doc), Persona::RuthlessEditor, &service)
        .await
        .unwrap();
    assert_eq!(appended, 0);
    assert_eq!(controller.comments().len(), 2);

    let generated_id = controller.comments()[1].id.clone();
    assert_ne!(generated_id, "c-1");

    assert!(controller.resolve_comment("c-1"));
    assert!(controller.hide_comment(&generated_id));
    assert_eq!(controller.visible_comments().count(), 1);
    assert_eq!(controller.comments()[0].status, CommentStatus::Resolved);

    // Clicking a comment re-selects the remembered batch range.
    doc.set_selection(SelectionRange::caret(0));
    assert!(controller.excerpt_click(&mut doc));
    assert_eq!(doc.selection(), SelectionRange::new(1, 40));

    assert_eq!(
        sink.kinds(),
        vec![
            EventKind::RequestStarted,
            EventKind::RequestSucceeded,
            EventKind::RequestStarted,
            EventKind::RequestSucceeded,
            EventKind::CommentStatusChanged,
            EventKind::CommentStatusChanged,
        ]
    );
}

#[tokio::test]
async fn failed_transform_leaves_everything_untouched() {
    init_tracing();
    let sink = Arc::new(RecordingSink::default());
    let ctx = EditorContext::new(Uuid::new_v4());
    let mut controller = SuggestionController::new(ctx, sink.clone());
    let mut ledger = AttributionLedger::new();
    let service = ScriptedService::new();

    let mut doc = TextDocument::new(DRAFT);
    ledger.on_document_changed(doc.char_len());
    doc.set_selection(SelectionRange::new(0, 9));

    service.push_transform(ServiceReply::Error {
        status: Some(500),
        body: "upstream exploded".to_string(),
    });

    let err = controller
        .request(Some(&doc), TransformMode::Shorten, &service)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("(500)"));

    // No partial state: document, ledger and machine are all unchanged.
    assert_eq!(doc.text(), DRAFT);
    assert_eq!(ledger.ai_chars(), 0);
    assert_eq!(controller.state(), &SuggestionState::Idle);
    assert_eq!(
        sink.kinds(),
        vec![EventKind::RequestStarted, EventKind::RequestFailed]
    );
}
