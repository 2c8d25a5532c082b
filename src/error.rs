use thiserror::Error;

use crate::services::config_service::ConfigError;

/// How much raw service-response body is surfaced to the writer.
const DETAIL_DISPLAY_CAP: usize = 240;

/// Failures surfaced to the host UI.
///
/// Every variant is local and recoverable: controllers settle back into a
/// stable idle state after any of these, and nothing is retried
/// automatically.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The document surface has not been attached yet.
    #[error("The editor is not ready yet. Try again in a moment.")]
    NotReady,

    /// No usable passage was selected or typed.
    #[error("Write something first.")]
    EmptyInput,

    /// Non-success response or transport failure from the text service.
    #[error("Writing service error: {detail}")]
    Service { detail: String },

    /// `apply()` or `dismiss()` was called with nothing awaiting review.
    #[error("No suggestion is awaiting review.")]
    NoSuggestion,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EditorError {
    /// Build a service error from a response status and raw body, keeping
    /// the detail short enough to display.
    pub fn service(status: Option<u16>, body: &str) -> Self {
        let detail = match status {
            Some(code) => format!("({}) {}", code, truncate_detail(body)),
            None => truncate_detail(body),
        };
        EditorError::Service { detail }
    }
}

fn truncate_detail(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= DETAIL_DISPLAY_CAP {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(DETAIL_DISPLAY_CAP).collect();
        format!("{}...", cut)
    }
}
