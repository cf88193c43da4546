//! Prompt assembly for both providers.
//!
//! Builders work with raw bytes; base64 and the provider wire formats are a
//! gateway concern. Order matters: attachment text first, then the user
//! message (or the default image prompt), then each image in upload order.

use bytes::Bytes;
use provider_protocol::relaying::HistoryTurn;

/// Prefix for text extracted from an uploaded document.
pub const ATTACHMENT_PREFIX: &str = "Attached document content:\n";

/// Stand-in prompt when the client sends images without any message.
pub const DEFAULT_IMAGE_PROMPT: &str = "Please describe these images.";

/// Most recent turns of client-supplied history kept on the OpenAI route.
pub const MAX_HISTORY: usize = 10;

/// Upper bound on images per request, enforced by the handlers.
pub const MAX_IMAGES: usize = 3;

/// One unit of input content for a single provider turn.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Text(String),
    Image { mime_type: String, data: Bytes },
}

/// An uploaded image as it arrives from the multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub mime_type: String,
    pub data: Bytes,
}

/// A provider-agnostic outbound chat message. Image content stays raw here;
/// the OpenAI gateway turns it into base64 data-URL blocks at the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub role: String,
    pub content: OutboundContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundContent {
    Text(String),
    Images(Vec<UploadedImage>),
}

/// Named policy: malformed history JSON defaults to an empty sequence.
pub fn parse_history(raw: &str) -> Vec<HistoryTurn> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Assemble the part list for the Gemini route.
///
/// An empty result means the request carried no usable content; the handler
/// rejects it with a 400 before any session is created.
pub fn build_parts(
    message: &str,
    images: &[UploadedImage],
    attachment_text: &str,
) -> Vec<PromptPart> {
    let mut parts = Vec::new();

    if !attachment_text.is_empty() {
        parts.push(PromptPart::Text(format!(
            "{ATTACHMENT_PREFIX}{attachment_text}"
        )));
    }

    if message.is_empty() && !images.is_empty() {
        parts.push(PromptPart::Text(DEFAULT_IMAGE_PROMPT.to_string()));
    } else if !message.is_empty() {
        parts.push(PromptPart::Text(message.to_string()));
    }

    for image in images {
        parts.push(PromptPart::Image {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
        });
    }

    parts
}

/// Assemble the message list for the OpenAI route.
///
/// History is truncated to the most recent [`MAX_HISTORY`] turns, then the
/// attachment text (system role), the user message, and a single user
/// message bundling all images are appended in that order.
pub fn build_messages(
    message: &str,
    attachment_text: &str,
    images: &[UploadedImage],
    history: Vec<HistoryTurn>,
) -> Vec<OutboundMessage> {
    let skip = history.len().saturating_sub(MAX_HISTORY);
    let mut messages: Vec<OutboundMessage> = history
        .into_iter()
        .skip(skip)
        .map(|turn| OutboundMessage {
            role: turn.role,
            content: OutboundContent::Text(turn.content),
        })
        .collect();

    if !attachment_text.is_empty() {
        messages.push(OutboundMessage {
            role: "system".to_string(),
            content: OutboundContent::Text(format!("{ATTACHMENT_PREFIX}{attachment_text}")),
        });
    }

    if !message.is_empty() {
        messages.push(OutboundMessage {
            role: "user".to_string(),
            content: OutboundContent::Text(message.to_string()),
        });
    }

    if !images.is_empty() {
        messages.push(OutboundMessage {
            role: "user".to_string(),
            content: OutboundContent::Images(images.to_vec()),
        });
    }

    messages
}
