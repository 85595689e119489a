use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use therapy_core::ChatMessage;
use therapy_llm::{ChatProvider, GenerationOptions, LlmProvider};

use crate::ServiceError;

/// Body of a raw generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
    #[serde(default)]
    pub options: GenerationOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub provider: &'static str,
    pub model: String,
    pub content: String,
    /// Unmodified provider response body.
    pub raw: Value,
}

/// Thin wrapper over the optional configured provider.
pub struct LlmService {
    provider: Option<Arc<LlmProvider>>,
    options: GenerationOptions,
}

impl LlmService {
    #[must_use]
    pub fn new(provider: Option<Arc<LlmProvider>>) -> Self {
        Self { provider, options: GenerationOptions::default() }
    }

    #[must_use]
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&LlmProvider, ServiceError> {
        self.provider.as_deref().ok_or_else(|| {
            ServiceError::NotConfigured("no LLM provider (set LLM_PROVIDER and an API key)".to_owned())
        })
    }

    pub fn ensure_configured(&self) -> Result<(), ServiceError> {
        self.provider().map(|_| ())
    }

    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ServiceError> {
        if request.messages.is_empty() {
            return Err(ServiceError::InvalidInput("messages must not be empty".to_owned()));
        }
        let provider = self.provider()?;
        let model = request.model.unwrap_or_else(|| provider.default_model().to_owned());
        let raw = provider.generate(&model, &request.messages, &request.options).await?;
        let content = provider.reply_text(&raw)?;
        Ok(GenerateResponse { provider: provider.kind().as_str(), model, content, raw })
    }

    /// Assistant reply for a transcript, using the default model and options.
    pub async fn reply(&self, transcript: &[ChatMessage]) -> Result<String, ServiceError> {
        let provider = self.provider()?;
        let raw = provider.generate(provider.default_model(), transcript, &self.options).await?;
        Ok(provider.reply_text(&raw)?)
    }
}
