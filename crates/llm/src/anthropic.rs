//! Anthropic Messages API adapter.

use std::time::Duration;

use serde_json::{Value, json};
use therapy_core::{ChatMessage, MessageRole};

use crate::error::LlmError;
use crate::http::{build_client, read_json};
use crate::options::GenerationOptions;

pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let base_url = base_url
            .unwrap_or_else(|| ANTHROPIC_DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        Ok(Self { client: build_client(timeout)?, api_key, base_url })
    }

    pub async fn generate(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<Value, LlmError> {
        let body = to_anthropic_body(model, messages, options);
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        read_json(response, "anthropic messages").await
    }
}

/// Request body for `POST /v1/messages`.
///
/// System messages are lifted into the top-level `system` field, joined by a
/// blank line when there are several. The penalty options have no Anthropic
/// equivalent and are dropped.
#[must_use]
pub fn to_anthropic_body(model: &str, messages: &[ChatMessage], options: &GenerationOptions) -> Value {
    let mut system: Option<String> = None;
    let mut turns = Vec::with_capacity(messages.len());

    for message in messages {
        match message.role {
            MessageRole::System => match &mut system {
                Some(existing) => {
                    existing.push_str("\n\n");
                    existing.push_str(&message.content);
                },
                None => system = Some(message.content.clone()),
            },
            MessageRole::User | MessageRole::Assistant => {
                turns.push(json!({ "role": message.role.as_str(), "content": message.content }));
            },
        }
    }

    let mut body = json!({
        "model": model,
        "messages": turns,
        "max_tokens": options.max_tokens,
        "temperature": options.temperature,
        "top_p": options.top_p,
    });
    if let Some(system) = system {
        body["system"] = json!(system);
    }
    if let Some(stop) = &options.stop {
        body["stop_sequences"] = json!(stop);
    }
    body
}

/// Concatenated `text` blocks of `content`.
pub(crate) fn reply_text(response: &Value) -> Result<String, LlmError> {
    let blocks = response
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::MissingField("content".to_owned()))?;
    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() && !blocks.is_empty() {
        return Err(LlmError::MissingField("content[].text".to_owned()));
    }
    Ok(text)
}
