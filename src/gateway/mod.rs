//! Provider gateways.
//!
//! Each upstream vendor is wrapped behind a small seam trait so the request
//! handlers can be driven by mock implementations in tests:
//!
//! - [`Conversation`] / [`ConversationFactory`] for the session-keyed Gemini
//!   route, where the handle owns the accumulated turn history.
//! - [`CompletionBackend`] for the stateless OpenAI route, where the client
//!   resends its history on every request.

use std::sync::Arc;

use async_trait::async_trait;
use provider_protocol::relaying::HistoryTurn;
use thiserror::Error;

use crate::prompt::{OutboundMessage, PromptPart};

mod gemini;
mod openai;

pub use gemini::{GeminiGateway, GEMINI_BASE_URL};
pub use openai::{OpenAiGateway, OPENAI_BASE_URL};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("provider response contained no reply text")]
    EmptyReply,
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// An opaque per-session conversation handle.
///
/// `append_and_generate` sends the parts as the next turn and, on success,
/// extends the internal history with both the outgoing turn and the reply.
/// A failed send leaves the history untouched.
#[async_trait]
pub trait Conversation: Send + Sync {
    async fn append_and_generate(&self, parts: Vec<PromptPart>) -> GatewayResult<String>;
}

/// Starts new conversation handles, seeded with client-supplied history.
pub trait ConversationFactory: Send + Sync {
    fn start(&self, history: Vec<HistoryTurn>) -> Arc<dyn Conversation>;
}

/// Stateless chat-completion call for the OpenAI route.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: Vec<OutboundMessage>) -> GatewayResult<String>;
}
