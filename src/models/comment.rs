use serde::{Deserialize, Serialize};

/// A named critique viewpoint with a fixed id and prompt framing.
///
/// The set is closed: the margin UI renders a picker over `Persona::ALL`
/// and the backend keys its prompt framing off the wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    RuthlessEditor,
    PatientTeacher,
    SkepticalReader,
    LineEditor,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::RuthlessEditor,
        Persona::PatientTeacher,
        Persona::SkepticalReader,
        Persona::LineEditor,
    ];

    /// Stable wire id.
    pub fn id(&self) -> &'static str {
        match self {
            Persona::RuthlessEditor => "ruthless-editor",
            Persona::PatientTeacher => "patient-teacher",
            Persona::SkepticalReader => "skeptical-reader",
            Persona::LineEditor => "line-editor",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::RuthlessEditor => "Ruthless Editor",
            Persona::PatientTeacher => "Patient Teacher",
            Persona::SkepticalReader => "Skeptical Reader",
            Persona::LineEditor => "Line Editor",
        }
    }

    /// One-line framing shown in the persona picker.
    pub fn framing(&self) -> &'static str {
        match self {
            Persona::RuthlessEditor => "Cuts everything that does not earn its place.",
            Persona::PatientTeacher => "Explains what is unclear and why.",
            Persona::SkepticalReader => "Pushes back on claims that lack support.",
            Persona::LineEditor => "Tightens sentences word by word.",
        }
    }

    pub fn from_id(id: &str) -> Option<Persona> {
        Persona::ALL.iter().copied().find(|p| p.id() == id)
    }
}

/// Lifecycle state of one piece of persona feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Open,
    Resolved,
    /// Terminal for display purposes; the record is retained.
    Hidden,
}

/// One piece of persona feedback bound to an excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaComment {
    pub id: String,
    pub persona: Persona,
    pub excerpt: String,
    pub comment: String,
    pub suggestion: String,
    pub status: CommentStatus,
}

/// Wire shape of one element of a feedback response. Every field is
/// optional; missing ones default to empty strings or a generated id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// Request body for the feedback endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub persona: Persona,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_wire_ids_round_trip() {
        for persona in Persona::ALL {
            assert_eq!(Persona::from_id(persona.id()), Some(persona));
            let json = serde_json::to_string(&persona).unwrap();
            assert_eq!(json, format!("\"{}\"", persona.id()));
        }
        assert_eq!(Persona::from_id("unknown"), None);
    }

    #[test]
    fn raw_comment_tolerates_missing_fields() {
        let raw: RawComment = serde_json::from_str("{}").unwrap();
        assert!(raw.id.is_none());
        assert!(raw.excerpt.is_none());

        let raw: RawComment =
            serde_json::from_str(r#"{"comment": "tighten this", "extra": 1}"#).unwrap();
        assert_eq!(raw.comment.as_deref(), Some("tighten this"));
    }
}
