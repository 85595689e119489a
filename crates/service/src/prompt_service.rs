use std::sync::Arc;

use chrono::Utc;
use therapy_core::{Prompt, PromptInput, PromptUpdate, TherapyMethod};
use therapy_storage::StorageBackend;
use therapy_storage::traits::PromptStore;

use crate::ServiceError;

pub struct PromptService {
    storage: Arc<StorageBackend>,
}

impl PromptService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn create_prompt(&self, input: PromptInput) -> Result<Prompt, ServiceError> {
        let prompt = Prompt::new(input, Utc::now())?;
        self.storage.save_prompt(&prompt).await?;
        Ok(prompt)
    }

    pub async fn get_prompt(&self, id: &str) -> Result<Prompt, ServiceError> {
        self.storage.get_prompt(id).await?.ok_or_else(|| ServiceError::not_found("prompt", id))
    }

    pub async fn list_prompts(&self) -> Result<Vec<Prompt>, ServiceError> {
        Ok(self.storage.list_prompts().await?)
    }

    pub async fn update_prompt(&self, id: &str, update: PromptUpdate) -> Result<Prompt, ServiceError> {
        let mut prompt = self.get_prompt(id).await?;
        prompt.apply_update(update, Utc::now())?;
        self.storage.save_prompt(&prompt).await?;
        Ok(prompt)
    }

    pub async fn delete_prompt(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(self.storage.delete_prompt(id).await?)
    }

    /// System prompt for a method: a stored `method:<key>` prompt wins over
    /// the built-in text.
    pub async fn system_prompt_for(&self, method: &TherapyMethod) -> Result<String, ServiceError> {
        let stored = self.storage.get_prompt_by_name(&Prompt::method_prompt_name(method.key)).await?;
        Ok(stored.map_or_else(|| method.system_prompt.to_owned(), |p| p.content))
    }
}
