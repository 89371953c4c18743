//! OpenAI Chat Completions with a bound JSON schema.
//!
//! The output schema travels as `response_format.json_schema` with `strict: true`,
//! so the provider constrains decoding and the message content is the JSON object.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    http_client, provider_error_message, strip_json_fences, LlmError, StructuredGenerator,
    StructuredRequest,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
    json_schema: JsonSchemaBinding<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaBinding<'a> {
    name: &'a str,
    description: &'a str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            endpoint: format!("{}/v1/chat/completions", base.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl StructuredGenerator for OpenAiClient {
    async fn generate(&self, request: &StructuredRequest<'_>) -> Result<Value, LlmError> {
        let body = ChatRequest {
            model: MODEL,
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaBinding {
                    name: request.output.name,
                    description: request.output.description,
                    schema: &request.output.schema,
                    strict: true,
                },
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("OpenAI API returned {status}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_error_message(text),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &parsed.usage {
            debug!(
                "OpenAI call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        extract_schema_output(parsed)
    }

    fn model(&self) -> &str {
        MODEL
    }
}

/// Reads the first choice and parses its content as the bound JSON object.
fn extract_schema_output(response: ChatResponse) -> Result<Value, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyContent)?;

    if let Some(refusal) = choice.message.refusal {
        return Err(LlmError::Refused(refusal));
    }
    if choice.finish_reason.as_deref() == Some("length") {
        return Err(LlmError::Truncated);
    }

    let content = choice.message.content.ok_or(LlmError::EmptyContent)?;
    let content = strip_json_fences(&content);
    if content.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> ChatResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parses_message_content_as_json() {
        let parsed = response(
            r#"{
                "choices": [{
                    "message": {"role": "assistant", "content": "{\"title\": \"ML Engineer\"}", "refusal": null},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 90, "completion_tokens": 40, "total_tokens": 130}
            }"#,
        );
        let value = extract_schema_output(parsed).unwrap();
        assert_eq!(value["title"], "ML Engineer");
    }

    #[test]
    fn test_refusal_is_reported() {
        let parsed = response(
            r#"{
                "choices": [{
                    "message": {"role": "assistant", "content": null, "refusal": "I can't help with that."},
                    "finish_reason": "stop"
                }]
            }"#,
        );
        let err = extract_schema_output(parsed).unwrap_err();
        assert!(matches!(err, LlmError::Refused(_)));
    }

    #[test]
    fn test_length_finish_is_truncated() {
        let parsed = response(
            r#"{
                "choices": [{
                    "message": {"role": "assistant", "content": "{\"title\": \"ML"},
                    "finish_reason": "length"
                }]
            }"#,
        );
        assert!(matches!(
            extract_schema_output(parsed).unwrap_err(),
            LlmError::Truncated
        ));
    }

    #[test]
    fn test_non_json_content_is_parse_error() {
        let parsed = response(
            r#"{
                "choices": [{
                    "message": {"role": "assistant", "content": "Title: ML Engineer"},
                    "finish_reason": "stop"
                }]
            }"#,
        );
        assert!(matches!(
            extract_schema_output(parsed).unwrap_err(),
            LlmError::Parse(_)
        ));
    }

    #[test]
    fn test_no_choices_is_empty_content() {
        let parsed = response(r#"{"choices": []}"#);
        assert!(matches!(
            extract_schema_output(parsed).unwrap_err(),
            LlmError::EmptyContent
        ));
    }

    #[test]
    fn test_request_binds_strict_schema() {
        let schema = serde_json::json!({"type": "object"});
        let body = ChatRequest {
            model: MODEL,
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
            messages: vec![],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaBinding {
                    name: "job_description",
                    description: "desc",
                    schema: &schema,
                    strict: true,
                },
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
        assert_eq!(json["model"], "gpt-4o-mini");
    }
}
