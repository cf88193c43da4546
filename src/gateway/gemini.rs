//! Gemini gateway: conversation handles over the `generateContent` REST API.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use provider_protocol::generate::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use provider_protocol::relaying::HistoryTurn;
use tokio::sync::Mutex;

use super::{Conversation, ConversationFactory, GatewayError, GatewayResult};
use crate::prompt::PromptPart;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Long-lived handle on the Gemini API; starts per-session conversations.
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGateway {
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Point the gateway at a different host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ConversationFactory for GeminiGateway {
    fn start(&self, history: Vec<HistoryTurn>) -> Arc<dyn Conversation> {
        Arc::new(GeminiConversation {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            history: Mutex::new(history.into_iter().map(seed_content).collect()),
        })
    }
}

/// One session's conversation: the accumulated `contents` list plus the
/// connection details needed to extend it.
struct GeminiConversation {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    history: Mutex<Vec<Content>>,
}

/// Gemini knows only `user` and `model` roles.
fn seed_content(turn: HistoryTurn) -> Content {
    let role = match turn.role.as_str() {
        "model" | "assistant" => "model",
        _ => "user",
    };
    Content {
        role: role.to_string(),
        parts: vec![Part::text(turn.content)],
    }
}

/// Base64 happens here, at the boundary closest to the wire call.
fn to_wire_parts(parts: Vec<PromptPart>) -> Vec<Part> {
    parts
        .into_iter()
        .map(|part| match part {
            PromptPart::Text(text) => Part::text(text),
            PromptPart::Image { mime_type, data } => {
                Part::inline_data(mime_type, BASE64_STANDARD.encode(&data))
            }
        })
        .collect()
}

#[async_trait]
impl Conversation for GeminiConversation {
    async fn append_and_generate(&self, parts: Vec<PromptPart>) -> GatewayResult<String> {
        let user_turn = Content {
            role: "user".to_string(),
            parts: to_wire_parts(parts),
        };

        // The lock is held across the provider call so interleaved sends on
        // the same session cannot reorder history.
        let mut history = self.history.lock().await;

        let mut contents = history.clone();
        contents.push(user_turn.clone());

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&GenerateContentRequest { contents })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let reply = payload.reply_text().ok_or(GatewayError::EmptyReply)?;

        history.push(user_turn);
        history.push(Content {
            role: "model".to_string(),
            parts: vec![Part::text(reply.clone())],
        });

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn conversation(base_url: &str, history: Vec<Content>) -> GeminiConversation {
        GeminiConversation {
            client: reqwest::Client::new(),
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            base_url: base_url.to_string(),
            history: Mutex::new(history),
        }
    }

    fn reply_body(text: &str) -> String {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]}
            }]
        })
        .to_string()
    }

    #[test]
    fn history_seeding_maps_roles_onto_gemini_vocabulary() {
        let turns = vec![
            HistoryTurn { role: "user".to_string(), content: "hi".to_string() },
            HistoryTurn { role: "assistant".to_string(), content: "hello".to_string() },
            HistoryTurn { role: "model".to_string(), content: "again".to_string() },
            HistoryTurn { role: "system".to_string(), content: "rules".to_string() },
        ];
        let contents: Vec<Content> = turns.into_iter().map(seed_content).collect();
        let roles: Vec<&str> = contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, ["user", "model", "model", "user"]);
    }

    #[test]
    fn image_parts_are_base64_encoded_at_the_wire() {
        let parts = to_wire_parts(vec![
            PromptPart::Text("look".to_string()),
            PromptPart::Image {
                mime_type: "image/png".to_string(),
                data: bytes::Bytes::from_static(&[1, 2, 3]),
            },
        ]);
        assert_eq!(parts[0], Part::text("look"));
        assert_eq!(parts[1], Part::inline_data("image/png", "AQID"));
    }

    #[tokio::test]
    async fn send_appends_both_turns_to_history() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body("A fine question."))
            .expect(2)
            .create_async()
            .await;

        let conversation = conversation(&server.url(), Vec::new());
        let first = conversation
            .append_and_generate(vec![PromptPart::Text("Hello".to_string())])
            .await
            .unwrap();
        assert_eq!(first, "A fine question.");

        conversation
            .append_and_generate(vec![PromptPart::Text("Follow up".to_string())])
            .await
            .unwrap();

        let history = conversation.history.lock().await;
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "model");
        assert_eq!(history[2].parts, vec![Part::text("Follow up")]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_error_leaves_history_untouched() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(429)
            .with_body("quota exhausted")
            .create_async()
            .await;

        let conversation = conversation(&server.url(), Vec::new());
        let err = conversation
            .append_and_generate(vec![PromptPart::Text("Hello".to_string())])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Upstream { status: 429, .. }));
        assert!(conversation.history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn blocked_response_is_an_empty_reply_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"candidates": [{}]}).to_string())
            .create_async()
            .await;

        let conversation = conversation(&server.url(), Vec::new());
        let err = conversation
            .append_and_generate(vec![PromptPart::Text("Hello".to_string())])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::EmptyReply));
    }
}
