//! Router assembly and shared application state.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::post,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::gateway::{CompletionBackend, ConversationFactory};
use crate::routers;
use crate::session::SessionStore;

/// Everything the handlers need, injected so tests can swap in mocks.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub gemini: Arc<dyn ConversationFactory>,
    pub openai: Arc<dyn CompletionBackend>,
}

pub fn build_app(state: AppState, allowed_origins: &[String], max_body_bytes: usize) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/chat", post(routers::gemini::handle_chat))
        .route("/api/openai", post(routers::openai::handle_openai))
        .layer(cors)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
