//! `POST /api/openai` — the stateless, OpenAI-backed chat route.
//!
//! The client resends its history on every request; no session id appears
//! in the response.

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

pub async fn handle_openai(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match collect_form(multipart).await {
        Ok(form) => form,
        Err(err) => {
            tracing::error!(error = %err, "failed to read openai form");
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

    if form.message.is_empty() && attachment_text.is_empty() && form.images.is_empty() {
        return bad_request(NO_CONTENT_MESSAGE);
    }

    let history = prompt::parse_history(form.history_raw.as_deref().unwrap_or("[]"));
    let messages = prompt::build_messages(&form.message, &attachment_text, &form.images, history);

    match state.openai.complete(messages).await {
        Ok(reply) => Json(ChatReply {
            reply,
            session_id: None,
        })
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "openai call failed");
            internal_error()
        }
    }
}
