use crate::models::EditorEvent;

/// Destination for fire-and-forget editor telemetry.
///
/// Implementations must not block the caller. Failures are noted locally
/// and swallowed; the editing flow never observes them.
pub trait EventSink: Send + Sync {
    fn record(&self, event: EditorEvent) -> anyhow::Result<()>;
}

/// Drops every event. For hosts that opt out of telemetry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: EditorEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writes each event as one JSON line on the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: EditorEvent) -> anyhow::Result<()> {
        let body = serde_json::to_string(&event)?;
        tracing::info!(target: "marginalia::events", "{}", body);
        Ok(())
    }
}

/// Best-effort emission used by the controllers.
pub(crate) fn emit(sink: &dyn EventSink, event: EditorEvent) {
    if let Err(err) = sink.record(event) {
        tracing::debug!(error = %err, "event sink rejected an event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EditorContext, EventKind};
    use uuid::Uuid;

    struct FailingSink;

    impl EventSink for FailingSink {
        fn record(&self, _event: EditorEvent) -> anyhow::Result<()> {
            anyhow::bail!("sink offline")
        }
    }

    #[test]
    fn emit_swallows_sink_failures() {
        let ctx = EditorContext::new(Uuid::new_v4());
        // Must not panic or propagate.
        emit(&FailingSink, EditorEvent::new(EventKind::RequestStarted, &ctx));
        emit(&NullSink, EditorEvent::new(EventKind::RequestStarted, &ctx));
    }
}
