use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::models::{FeedbackPayload, RawComment, TransformMode, TransformPayload};

/// Outcome of one text-service call.
///
/// Callers must handle all three arms: a parsed value, a response the
/// service produced but we could not interpret, and a non-success status
/// or transport failure. The split matters because the feedback flow
/// degrades `Malformed` to zero comments while the transform flow surfaces
/// it as an error.
#[derive(Debug, Clone)]
pub enum ServiceReply<T> {
    Ok(T),
    Malformed { detail: String },
    Error { status: Option<u16>, body: String },
}

/// The generative backend, seen from the core as a pure function from a
/// structured request to text or a comment list.
#[async_trait]
pub trait TextService: Send + Sync {
    async fn transform(&self, request: &TransformPayload) -> ServiceReply<String>;
    async fn feedback(&self, request: &FeedbackPayload) -> ServiceReply<Vec<RawComment>>;
}

/// Wire shape of a transform request. `full_text` stays client-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransformRequest<'a> {
    action: TransformMode,
    selected_text: &'a str,
    context_before: &'a str,
    context_after: &'a str,
    from: usize,
    to: usize,
}

#[derive(Debug, Deserialize)]
struct TransformResponse {
    result: String,
}

/// HTTP client for the hosted text service.
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a client from the saved configuration.
    pub fn from_config() -> Result<Self, EditorError> {
        let (base_url, api_key) = super::config_service::get_effective_config()?;
        Ok(Self::new(&base_url, &api_key))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> ServiceReply<serde_json::Value> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                return ServiceReply::Error {
                    status: None,
                    body: err.to_string(),
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return ServiceReply::Error {
                status: Some(status.as_u16()),
                body,
            };
        }

        match response.json::<serde_json::Value>().await {
            Ok(value) => ServiceReply::Ok(value),
            Err(err) => ServiceReply::Malformed {
                detail: err.to_string(),
            },
        }
    }
}

#[async_trait]
impl TextService for LlmClient {
    async fn transform(&self, request: &TransformPayload) -> ServiceReply<String> {
        let wire = TransformRequest {
            action: request.action,
            selected_text: &request.selected_text,
            context_before: &request.context_before,
            context_after: &request.context_after,
            from: request.from,
            to: request.to,
        };

        match self.post_json("transform", &wire).await {
            ServiceReply::Ok(value) => match serde_json::from_value::<TransformResponse>(value) {
                Ok(parsed) => ServiceReply::Ok(parsed.result),
                Err(err) => ServiceReply::Malformed {
                    detail: err.to_string(),
                },
            },
            ServiceReply::Malformed { detail } => ServiceReply::Malformed { detail },
            ServiceReply::Error { status, body } => ServiceReply::Error { status, body },
        }
    }

    async fn feedback(&self, request: &FeedbackPayload) -> ServiceReply<Vec<RawComment>> {
        match self.post_json("feedback", request).await {
            ServiceReply::Ok(value) => match comments_from_value(value) {
                Some(comments) => ServiceReply::Ok(comments),
                None => ServiceReply::Malformed {
                    detail: "feedback response is not a JSON array".to_string(),
                },
            },
            ServiceReply::Malformed { detail } => ServiceReply::Malformed { detail },
            ServiceReply::Error { status, body } => ServiceReply::Error { status, body },
        }
    }
}

/// A feedback body is expected to be a JSON array of comment objects.
/// Elements that are not objects normalize to an all-defaults comment;
/// anything other than an array is malformed.
fn comments_from_value(value: serde_json::Value) -> Option<Vec<RawComment>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_array_feedback_body_is_malformed() {
        assert!(comments_from_value(json!("not an array")).is_none());
        assert!(comments_from_value(json!({"comments": []})).is_none());
    }

    #[test]
    fn array_elements_normalize_with_defaults() {
        let comments = comments_from_value(json!([
            {"id": "c1", "excerpt": "a", "comment": "b", "suggestion": "c"},
            {"comment": "only a comment"},
            42,
        ]))
        .unwrap();

        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].id.as_deref(), Some("c1"));
        assert_eq!(comments[1].comment.as_deref(), Some("only a comment"));
        assert!(comments[1].id.is_none());
        assert!(comments[2].id.is_none());
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = LlmClient::new("https://example.test/v1/", "k");
        assert_eq!(client.endpoint("transform"), "https://example.test/v1/transform");

        let client = LlmClient::new("https://example.test/v1", "k");
        assert_eq!(client.endpoint("feedback"), "https://example.test/v1/feedback");
    }
}
