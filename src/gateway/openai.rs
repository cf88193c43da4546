//! OpenAI gateway: stateless calls to the chat-completions API.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use provider_protocol::chat::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ContentBlock, ImageUrl,
    MessageContent,
};

use super::{CompletionBackend, GatewayError, GatewayResult};
use crate::prompt::{OutboundContent, OutboundMessage};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

const TEMPERATURE: f32 = 0.7;

pub struct OpenAiGateway {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiGateway {
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Point the gateway at a different host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Image bundles become base64 data-URL blocks here, at the wire boundary.
fn to_wire_message(message: OutboundMessage) -> ChatMessage {
    match message.content {
        OutboundContent::Text(text) => ChatMessage {
            role: message.role,
            content: MessageContent::Text(text),
        },
        OutboundContent::Images(images) => ChatMessage {
            role: message.role,
            content: MessageContent::Blocks(
                images
                    .into_iter()
                    .map(|image| ContentBlock::ImageUrl {
                        image_url: ImageUrl {
                            url: format!(
                                "data:{};base64,{}",
                                image.mime_type,
                                BASE64_STANDARD.encode(&image.data)
                            ),
                        },
                    })
                    .collect(),
            ),
        },
    }
}

#[async_trait]
impl CompletionBackend for OpenAiGateway {
    async fn complete(&self, messages: Vec<OutboundMessage>) -> GatewayResult<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.into_iter().map(to_wire_message).collect(),
            temperature: Some(TEMPERATURE),
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
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

        let payload: ChatCompletionResponse = response.json().await?;
        payload.reply_text().ok_or(GatewayError::EmptyReply)
    }
}
