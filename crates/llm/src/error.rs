//! Typed error enum for the LLM crate.

use thiserror::Error;

/// Errors from LLM API operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// Non-success status; `message` is the provider's `error.message` when
    /// the body carries one, otherwise the HTTP status text.
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing field in response: {0}")]
    MissingField(String),
    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),
    #[error("unknown LLM provider: {0}")]
    UnknownProvider(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl LlmError {
    /// Whether the failure came from the upstream service rather than from us.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::HttpRequest(_) | Self::Provider { .. } | Self::MissingField(_))
    }
}
