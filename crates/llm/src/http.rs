//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use serde_json::Value;

use crate::error::LlmError;

pub(crate) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| LlmError::ClientInit(e.to_string()))
}

/// Read the body of a provider response, turning non-success statuses into
/// [`LlmError::Provider`].
pub(crate) async fn read_json(response: reqwest::Response, context: &str) -> Result<Value, LlmError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = provider_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_owned());
        tracing::warn!(status = status.as_u16(), %message, "{context} failed");
        return Err(LlmError::Provider { status: status.as_u16(), message });
    }

    serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
        context: format!("{context} response (body: {})", truncate(&body, 200)),
        source: e,
    })
}

/// `error.message` from an error body, as both OpenAI and Anthropic send it.
pub(crate) fn provider_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
