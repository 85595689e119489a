//! JournalStore implementation for PgStorage.

use super::*;

use crate::traits::JournalStore;
use async_trait::async_trait;

#[async_trait]
impl JournalStore for PgStorage {
    async fn save_journal_entry(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO journal_entries ({JOURNAL_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
             ON CONFLICT (id) DO UPDATE SET
               content = EXCLUDED.content,
               mood = EXCLUDED.mood,
               tags = EXCLUDED.tags,
               updated_at = EXCLUDED.updated_at"
        ))
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.profile_id)
        .bind(&entry.content)
        .bind(&entry.mood)
        .bind(serde_json::to_value(&entry.tags)?)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_journal_entry(&self, id: &str) -> Result<Option<JournalEntry>, StorageError> {
        let row =
            sqlx::query(&format!("SELECT {JOURNAL_COLUMNS} FROM journal_entries WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| row_to_journal_entry(&r)).transpose()
    }

    async fn list_journal_entries(
        &self,
        profile_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {JOURNAL_COLUMNS} FROM journal_entries WHERE profile_id = $1
             ORDER BY created_at DESC, id ASC LIMIT $2"
        ))
        .bind(profile_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_journal_entry).collect()
    }

    async fn delete_journal_entry(&self, id: &str) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM journal_entries WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
