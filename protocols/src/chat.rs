//! OpenAI Chat Completions API wire types.
//!
//! Only the subset the relay actually sends and reads: a message list with
//! string-or-blocks content, and the first choice of the response.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// ID of the model to use.
    pub model: String,

    /// The conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,

    /// What sampling temperature to use, between 0 and 2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,

    pub content: MessageContent,
}

/// Message content: either a plain string or a list of typed blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Either a remote URL or a `data:{mime};base64,{payload}` URL.
    pub url: String,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Absent when the model returns a refusal or tool call instead of text.
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Textual content of the first choice, if any.
    pub fn reply_text(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_with_string_content_serializes_flat() {
        let message = ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Text("Hello".to_string()),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "Hello"}));
    }

    #[test]
    fn image_block_serializes_with_type_tag() {
        let message = ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Blocks(vec![ContentBlock::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/png;base64,AAAA".to_string(),
                },
            }]),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
                ]
            })
        );
    }

    #[test]
    fn response_first_choice_text() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Hi there"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.reply_text().as_deref(), Some("Hi there"));
    }

    #[test]
    fn response_without_choices_has_no_reply() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.reply_text().is_none());
    }
}
