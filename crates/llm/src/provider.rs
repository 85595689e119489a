//! Provider selection and the capability trait the service layer calls.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use therapy_core::{ChatMessage, env_non_empty, env_parse_with_default};

use crate::anthropic::{self, ANTHROPIC_DEFAULT_MODEL, AnthropicClient};
use crate::error::LlmError;
use crate::openai::{self, OPENAI_DEFAULT_MODEL, OpenAiClient};
use crate::options::GenerationOptions;

/// Something that can turn a transcript into a model reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Raw provider response body.
    async fn generate(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<Value, LlmError>;

    /// Assistant text of a response returned by [`ChatProvider::generate`].
    fn reply_text(&self, response: &Value) -> Result<String, LlmError>;

    /// Model used when the caller does not name one.
    fn default_model(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    const fn key_var(&self) -> &'static str {
        match *self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    const fn fallback_model(&self) -> &'static str {
        match *self {
            Self::OpenAi => OPENAI_DEFAULT_MODEL,
            Self::Anthropic => ANTHROPIC_DEFAULT_MODEL,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(LlmError::UnknownProvider(other.to_owned())),
        }
    }
}

/// Everything needed to build an [`LlmProvider`].
#[derive(Clone)]
pub struct LlmSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("kind", &self.kind)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmSettings {
    #[must_use]
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
            model: kind.fallback_model().to_owned(),
            base_url: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Reads `LLM_PROVIDER` (default `openai`), `LLM_API_KEY` or the
    /// provider-specific key, `LLM_MODEL`, `LLM_BASE_URL` and
    /// `LLM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, LlmError> {
        let kind = match env_non_empty("LLM_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => ProviderKind::OpenAi,
        };
        let api_key = env_non_empty("LLM_API_KEY")
            .or_else(|| env_non_empty(kind.key_var()))
            .ok_or(LlmError::MissingApiKey(kind.as_str()))?;
        let timeout_secs: u64 = env_parse_with_default("LLM_TIMEOUT_SECS", 0);

        Ok(Self {
            kind,
            api_key,
            model: env_non_empty("LLM_MODEL").unwrap_or_else(|| kind.fallback_model().to_owned()),
            base_url: env_non_empty("LLM_BASE_URL"),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }
}

/// The configured provider. Chosen once; every call goes through the same
/// variant.
#[derive(Debug)]
pub enum LlmProvider {
    OpenAi { client: OpenAiClient, model: String },
    Anthropic { client: AnthropicClient, model: String },
}

impl LlmProvider {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let LlmSettings { kind, api_key, model, base_url, timeout } = settings;
        let provider = match kind {
            ProviderKind::OpenAi => {
                Self::OpenAi { client: OpenAiClient::new(api_key, base_url, timeout)?, model }
            },
            ProviderKind::Anthropic => {
                Self::Anthropic { client: AnthropicClient::new(api_key, base_url, timeout)?, model }
            },
        };
        tracing::info!(provider = kind.as_str(), model = provider.default_model(), "LLM provider configured");
        Ok(provider)
    }

    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(LlmSettings::from_env()?)
    }

    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match *self {
            Self::OpenAi { .. } => ProviderKind::OpenAi,
            Self::Anthropic { .. } => ProviderKind::Anthropic,
        }
    }
}

#[async_trait]
impl ChatProvider for LlmProvider {
    async fn generate(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<Value, LlmError> {
        tracing::debug!(provider = self.kind().as_str(), model, messages = messages.len(), "LLM generate");
        match self {
            Self::OpenAi { client, .. } => client.generate(model, messages, options).await,
            Self::Anthropic { client, .. } => client.generate(model, messages, options).await,
        }
    }

    fn reply_text(&self, response: &Value) -> Result<String, LlmError> {
        match self {
            Self::OpenAi { .. } => openai::reply_text(response),
            Self::Anthropic { .. } => anthropic::reply_text(response),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::OpenAi { model, .. } | Self::Anthropic { model, .. } => model,
        }
    }
}
