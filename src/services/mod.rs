pub mod config_service;
mod event_sink;
mod llm_client;

pub use config_service::{Config, ConfigError};
pub use event_sink::{EventSink, NullSink, TracingSink};
pub use llm_client::{LlmClient, ServiceReply, TextService};

pub(crate) use event_sink::emit;
