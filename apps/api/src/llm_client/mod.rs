//! Single point of entry for all model provider calls.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Callers depend on [`StructuredGenerator`] and receive schema-conformant JSON.
//!
//! Two strategies force structured output:
//! - [`openai::OpenAiClient`] binds a JSON schema to the response format.
//! - [`anthropic::AnthropicClient`] forces a single tool call whose input is the schema.
//!
//! Exactly one outbound request per `generate` call. No retries, no caching.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::{Config, LlmProvider};

pub mod anthropic;
#[cfg(test)]
pub mod mock;
pub mod openai;
pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request to the model provider timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM did not call the required tool '{tool}'")]
    MissingToolCall { tool: String },

    #[error("LLM refused the request: {0}")]
    Refused(String),

    #[error("LLM output was truncated before the JSON object was complete")]
    Truncated,

    #[error("LLM output does not match the schema: {0}")]
    Schema(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(err)
        }
    }
}

impl LlmError {
    /// True when the provider itself failed (network, timeout, error status),
    /// false when it answered with unusable output.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            LlmError::Http(_) | LlmError::Timeout | LlmError::Api { .. }
        )
    }
}

/// Output contract the model must satisfy.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    /// Schema / tool name. Must match `^[a-zA-Z0-9_-]{1,64}$` for both providers.
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema for the output object.
    pub schema: Value,
}

/// One structured generation call.
#[derive(Debug, Clone)]
pub struct StructuredRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub output: &'a OutputSchema,
}

/// Capability shared by every provider integration: prompt in, schema-conformant JSON out.
///
/// Carried in `AppState` as `Arc<dyn StructuredGenerator>`.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate(&self, request: &StructuredRequest<'_>) -> Result<Value, LlmError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Builds the shared HTTP client with the configured request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Builds the generator selected by `LLM_PROVIDER`.
pub fn build_generator(config: &Config) -> Result<Arc<dyn StructuredGenerator>, LlmError> {
    let timeout = Duration::from_secs(config.llm_timeout_secs);
    let base_url = config.llm_base_url.clone();

    let generator: Arc<dyn StructuredGenerator> = match config.llm_provider {
        LlmProvider::OpenAi => Arc::new(openai::OpenAiClient::new(
            config.llm_api_key.clone(),
            base_url,
            timeout,
        )?),
        LlmProvider::Anthropic => Arc::new(anthropic::AnthropicClient::new(
            config.llm_api_key.clone(),
            base_url,
            timeout,
        )?),
    };

    Ok(generator)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let rest = rest.trim_start();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}

/// Reads an error body, preferring the provider's `error.message` field.
pub(crate) fn provider_error_message(body: String) -> String {
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body)
}
