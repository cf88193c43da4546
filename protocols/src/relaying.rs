//! The relay's own client-facing bodies.

use serde::{Deserialize, Serialize};

/// One role-tagged turn of client-supplied conversation history.
///
/// Roles are provider-agnostic at this point; each gateway maps them onto
/// its own vocabulary (`assistant` vs `model`, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

/// Successful reply body. `sessionId` is only present on the session-keyed
/// (Gemini) route; the OpenAI route exposes no session concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,

    #[serde(
        rename = "sessionId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
}

/// Error body for 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reply_without_session_omits_the_field() {
        let body = ChatReply {
            reply: "hi".to_string(),
            session_id: None,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"reply": "hi"}));
    }

    #[test]
    fn reply_with_session_uses_camel_case_key() {
        let body = ChatReply {
            reply: "hi".to_string(),
            session_id: Some("abc".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"reply": "hi", "sessionId": "abc"})
        );
    }
}
