//! OpenAI-compatible chat completions adapter.

use std::time::Duration;

use serde_json::{Value, json};
use therapy_core::ChatMessage;

use crate::error::LlmError;
use crate::http::{build_client, read_json};
use crate::options::GenerationOptions;

pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let base_url = base_url
            .unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_owned())
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
        let body = to_openai_body(model, messages, options);
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        read_json(response, "openai chat completion").await
    }
}

/// Request body for `POST /v1/chat/completions`.
#[must_use]
pub fn to_openai_body(model: &str, messages: &[ChatMessage], options: &GenerationOptions) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
        "temperature": options.temperature,
        "max_tokens": options.max_tokens,
        "top_p": options.top_p,
        "frequency_penalty": options.frequency_penalty,
        "presence_penalty": options.presence_penalty,
    });
    if let Some(stop) = &options.stop {
        body["stop"] = json!(stop);
    }
    body
}

/// `choices[0].message.content`
pub(crate) fn reply_text(response: &Value) -> Result<String, LlmError> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| LlmError::MissingField("choices[0].message.content".to_owned()))
}
