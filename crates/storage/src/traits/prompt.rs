use async_trait::async_trait;
use therapy_core::Prompt;

use crate::error::StorageError;

/// Managed prompt persistence. Prompt names are unique.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Insert or replace by id. A name already used by another prompt yields
    /// [`StorageError::Duplicate`].
    async fn save_prompt(&self, prompt: &Prompt) -> Result<(), StorageError>;

    async fn get_prompt(&self, id: &str) -> Result<Option<Prompt>, StorageError>;

    async fn get_prompt_by_name(&self, name: &str) -> Result<Option<Prompt>, StorageError>;

    /// All prompts ordered by name.
    async fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError>;

    async fn delete_prompt(&self, id: &str) -> Result<bool, StorageError>;
}
