//! Server configuration, sourced from CLI flags with env-var fallbacks.

use std::net::SocketAddr;

use clap::Parser;

use crate::session::SessionIdPolicy;

#[derive(Debug, Clone, Parser)]
#[command(name = "chat-relay", about = "Relay between a web chat client and the Gemini / OpenAI chat APIs")]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// API key for the Gemini route.
    #[arg(long, env = "GOOGLE_API_KEY", default_value = "", hide_env_values = true)]
    pub google_api_key: String,

    /// API key for the OpenAI route.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub openai_api_key: String,

    /// Origins allowed by CORS, comma separated.
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        default_value = "http://localhost:5173",
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long, default_value = "gemini-1.5-flash-latest")]
    pub gemini_model: String,

    #[arg(long, default_value = "gpt-4o")]
    pub openai_model: String,

    /// Directory for rolling log files.
    #[arg(long, default_value = "logs")]
    pub log_dir: String,

    /// Maximum accepted request body size in bytes.
    #[arg(long, default_value_t = 16 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// What to do with a client-supplied session id the store does not know.
    #[arg(long, value_enum, default_value_t = SessionIdPolicy::Mint)]
    pub session_id_policy: SessionIdPolicy,
}

impl ServerArgs {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_contract() {
        let args = ServerArgs::parse_from(["chat-relay"]);
        assert_eq!(args.port, 5000);
        assert_eq!(args.gemini_model, "gemini-1.5-flash-latest");
        assert_eq!(args.openai_model, "gpt-4o");
        assert_eq!(args.max_body_bytes, 16 * 1024 * 1024);
        assert_eq!(args.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(args.session_id_policy, SessionIdPolicy::Mint);
    }

    #[test]
    fn allowed_origins_splits_on_commas() {
        let args = ServerArgs::parse_from([
            "chat-relay",
            "--allowed-origins",
            "http://localhost:5173,https://chat.example.com",
        ]);
        assert_eq!(args.allowed_origins.len(), 2);
        assert_eq!(args.allowed_origins[1], "https://chat.example.com");
    }

    #[test]
    fn bind_addr_parses_host_and_port() {
        let args = ServerArgs::parse_from(["chat-relay", "--host", "127.0.0.1", "--port", "8080"]);
        assert_eq!(args.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
    }
}
