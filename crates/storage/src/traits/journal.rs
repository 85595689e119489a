use async_trait::async_trait;
use therapy_core::JournalEntry;

use crate::error::StorageError;

/// Journal entry persistence.
#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn save_journal_entry(&self, entry: &JournalEntry) -> Result<(), StorageError>;

    async fn get_journal_entry(&self, id: &str) -> Result<Option<JournalEntry>, StorageError>;

    /// Entries of a profile, newest first.
    async fn list_journal_entries(
        &self,
        profile_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, StorageError>;

    async fn delete_journal_entry(&self, id: &str) -> Result<bool, StorageError>;
}
