use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Prefix of prompt names that override a therapy method's system prompt.
pub const METHOD_PROMPT_PREFIX: &str = "method:";

/// A managed LLM prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    pub id: String,
    /// Unique, e.g. `method:cbt` or `session-opening`.
    pub name: String,
    pub content: String,
    pub method: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptInput {
    pub name: String,
    pub content: String,
    pub method: Option<String>,
    #[serde(default)]
    pub is_system: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptUpdate {
    pub content: Option<String>,
    pub method: Option<String>,
    pub is_system: Option<bool>,
}

impl Prompt {
    pub fn new(input: PromptInput, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("prompt name must not be empty".to_owned()));
        }
        if input.content.trim().is_empty() {
            return Err(CoreError::InvalidInput("prompt content must not be empty".to_owned()));
        }
        Ok(Self {
            id: crate::new_id(),
            name: name.to_owned(),
            content: input.content,
            method: input.method,
            is_system: input.is_system,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, update: PromptUpdate, now: DateTime<Utc>) -> Result<(), CoreError> {
        if let Some(content) = update.content {
            if content.trim().is_empty() {
                return Err(CoreError::InvalidInput("prompt content must not be empty".to_owned()));
            }
            self.content = content;
        }
        if let Some(method) = update.method {
            self.method = Some(method);
        }
        if let Some(is_system) = update.is_system {
            self.is_system = is_system;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Name under which a stored prompt overrides a method's system prompt.
    #[must_use]
    pub fn method_prompt_name(method_key: &str) -> String {
        format!("{METHOD_PROMPT_PREFIX}{method_key}")
    }
}
