use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Explicit identity for one editing session over one document.
///
/// Passed into every controller constructor and stamped onto every event,
/// instead of any process-wide lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorContext {
    pub session_id: Uuid,
    pub document_id: Uuid,
}

impl EditorContext {
    /// Fresh session over an existing document.
    pub fn new(document_id: Uuid) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            document_id,
        }
    }
}
