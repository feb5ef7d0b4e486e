use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only the database URL is required; without a gateway key the service
/// still starts, and requests must then carry their own credentials.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Process-wide default gateway key — resolution tier 3.
    pub openrouter_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub embedding_model: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            llm_model: optional_env("LLM_MODEL"),
            embedding_model: optional_env("EMBEDDING_MODEL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
