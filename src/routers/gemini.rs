//! `POST /api/chat` — the session-keyed, Gemini-backed chat route.

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use provider_protocol::relaying::ChatReply;

use super::error::{
    bad_request, internal_error, NO_CONTENT_MESSAGE, TOO_MANY_IMAGES_MESSAGE,
};
use super::form::collect_form;
use crate::extract;
use crate::prompt::{self, MAX_IMAGES};
use crate::server::AppState;

pub async fn handle_chat(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match collect_form(multipart).await {
        Ok(form) => form,
        Err(err) => {
            tracing::error!(error = %err, "failed to read chat form");
            return internal_error();
        }
    };

    if form.images.len() > MAX_IMAGES {
        return bad_request(TOO_MANY_IMAGES_MESSAGE);
    }

    let attachment_text = match extract::extract(form.attachment.as_ref()) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(error = %err, "attachment extraction failed");
            return internal_error();
        }
    };

    let parts = prompt::build_parts(&form.message, &form.images, &attachment_text);
    if parts.is_empty() {
        // No session gets created for an unusable request.
        return bad_request(NO_CONTENT_MESSAGE);
    }

    let history = prompt::parse_history(form.history_raw.as_deref().unwrap_or("[]"));
    let (conversation, session_id) = state.sessions.get_or_create(
        form.session_id.as_deref(),
        history,
        state.gemini.as_ref(),
    );

    match conversation.append_and_generate(parts).await {
        Ok(reply) => {
            tracing::info!(session_id = %session_id, "chat turn completed");
            Json(ChatReply {
                reply,
                session_id: Some(session_id),
            })
            .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, session_id = %session_id, "gemini call failed");
            internal_error()
        }
    }
}
