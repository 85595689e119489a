//! PromptStore implementation for PgStorage.

use super::*;

use crate::traits::PromptStore;
use async_trait::async_trait;

#[async_trait]
impl PromptStore for PgStorage {
    async fn save_prompt(&self, prompt: &Prompt) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO prompts ({PROMPT_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7)
             ON CONFLICT (id) DO UPDATE SET
               name = EXCLUDED.name,
               content = EXCLUDED.content,
               method = EXCLUDED.method,
               is_system = EXCLUDED.is_system,
               updated_at = EXCLUDED.updated_at"
        ))
        .bind(&prompt.id)
        .bind(&prompt.name)
        .bind(&prompt.content)
        .bind(&prompt.method)
        .bind(prompt.is_system)
        .bind(prompt.created_at)
        .bind(prompt.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_prompt(&self, id: &str) -> Result<Option<Prompt>, StorageError> {
        let row = sqlx::query(&format!("SELECT {PROMPT_COLUMNS} FROM prompts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_prompt(&r)).transpose()
    }

    async fn get_prompt_by_name(&self, name: &str) -> Result<Option<Prompt>, StorageError> {
        let row = sqlx::query(&format!("SELECT {PROMPT_COLUMNS} FROM prompts WHERE name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_prompt(&r)).transpose()
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError> {
        let rows = sqlx::query(&format!("SELECT {PROMPT_COLUMNS} FROM prompts ORDER BY name ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_prompt).collect()
    }

    async fn delete_prompt(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
