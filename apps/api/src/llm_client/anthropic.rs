//! Anthropic Messages API with a forced tool call.
//!
//! The output schema is declared as the `input_schema` of a single tool and
//! `tool_choice` pins the model to it, so the answer arrives as the tool's
//! `input` object rather than free text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    http_client, provider_error_message, LlmError, StructuredGenerator, StructuredRequest,
};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    tools: Vec<ToolDefinition<'a>>,
    tool_choice: ToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    name: Option<String>,
    input: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl AnthropicClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            endpoint: format!("{}/v1/messages", base.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl StructuredGenerator for AnthropicClient {
    async fn generate(&self, request: &StructuredRequest<'_>) -> Result<Value, LlmError> {
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            system: request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
            tools: vec![ToolDefinition {
                name: request.output.name,
                description: request.output.description,
                input_schema: &request.output.schema,
            }],
            tool_choice: ToolChoice {
                choice_type: "tool",
                name: request.output.name,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Anthropic API returned {status}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_error_message(text),
            });
        }

        let parsed: AnthropicResponse = serde_json::from_str(&text)?;
        debug!(
            "Anthropic call succeeded: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        extract_tool_input(parsed, request.output.name)
    }

    fn model(&self) -> &str {
        MODEL
    }
}

/// Pulls the forced tool call's `input` out of a Messages response.
fn extract_tool_input(response: AnthropicResponse, tool: &str) -> Result<Value, LlmError> {
    let input = response
        .content
        .into_iter()
        .find(|b| b.block_type == "tool_use" && b.name.as_deref() == Some(tool))
        .and_then(|b| b.input);

    match (input, response.stop_reason.as_deref()) {
        (Some(input), _) => Ok(input),
        (None, Some("max_tokens")) => Err(LlmError::Truncated),
        (None, _) => Err(LlmError::MissingToolCall {
            tool: tool.to_string(),
        }),
    }
}
