//! Headless core for an AI writing copilot.
//!
//! A writer edits prose, asks for AI transformations (rewrite, expand,
//! shorten, tone) or persona critique on a selected passage, and tracks
//! how much of the final text came from the human versus the AI.
//!
//! The crate owns the suggestion lifecycle, the attribution ledger, and
//! the persona-feedback comment lifecycle. The editing surface
//! ([`DocumentModel`]), the generative backend ([`TextService`]) and the
//! telemetry destination ([`EventSink`]) are traits the host provides;
//! [`TextDocument`], [`LlmClient`] and [`TracingSink`] are the built-in
//! implementations.

mod editor;
mod error;
mod models;
mod services;

pub use editor::*;
pub use error::*;
pub use models::*;
pub use services::*;
