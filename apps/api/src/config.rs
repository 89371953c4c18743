use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which external provider backs the structured generation client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI Chat Completions with a bound `json_schema` response format.
    OpenAi,
    /// Anthropic Messages with a single forced tool call.
    Anthropic,
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            other => bail!("LLM_PROVIDER must be 'openai' or 'anthropic', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm_provider: LlmProvider,
    /// API key for whichever provider `llm_provider` selects.
    pub llm_api_key: String,
    /// Overrides the provider's public endpoint (proxies, local mocks).
    pub llm_base_url: Option<String>,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_provider: LlmProvider = std::env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .parse()?;

        let llm_api_key = match llm_provider {
            LlmProvider::OpenAi => require_env("OPENAI_API_KEY")?,
            LlmProvider::Anthropic => require_env("ANTHROPIC_API_KEY")?,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_provider,
            llm_api_key,
            llm_base_url: std::env::var("LLM_BASE_URL").ok().filter(|s| !s.is_empty()),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
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
