use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay::config::ServerArgs;
use relay::gateway::{GeminiGateway, OpenAiGateway};
use relay::server::{build_app, AppState};
use relay::session::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    let file_appender = tracing_appender::rolling::daily(&args.log_dir, "chat-relay.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    let client = reqwest::Client::new();
    let state = AppState {
        sessions: Arc::new(SessionStore::new(args.session_id_policy)),
        gemini: Arc::new(GeminiGateway::new(
            client.clone(),
            args.google_api_key.clone(),
            args.gemini_model.clone(),
        )),
        openai: Arc::new(OpenAiGateway::new(
            client,
            args.openai_api_key.clone(),
            args.openai_model.clone(),
        )),
    };

    let app = build_app(state, &args.allowed_origins, args.max_body_bytes);
    let addr = args.bind_addr()?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "chat relay listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
