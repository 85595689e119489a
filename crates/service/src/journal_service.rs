use std::sync::Arc;

use chrono::Utc;
use therapy_core::{JournalEntry, JournalInput};
use therapy_storage::StorageBackend;
use therapy_storage::traits::{JournalStore, ProfileStore};

use crate::ServiceError;

pub struct JournalService {
    storage: Arc<StorageBackend>,
}

impl JournalService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn create_entry(
        &self,
        profile_id: &str,
        input: JournalInput,
    ) -> Result<JournalEntry, ServiceError> {
        let profile = self
            .storage
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile", profile_id))?;
        let entry = JournalEntry::new(profile.user_id, profile.id, input, Utc::now())?;
        self.storage.save_journal_entry(&entry).await?;
        Ok(entry)
    }

    pub async fn get_entry(&self, id: &str) -> Result<JournalEntry, ServiceError> {
        self.storage
            .get_journal_entry(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("journal entry", id))
    }

    pub async fn list_entries(
        &self,
        profile_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, ServiceError> {
        Ok(self.storage.list_journal_entries(profile_id, limit).await?)
    }

    pub async fn update_entry(&self, id: &str, input: JournalInput) -> Result<JournalEntry, ServiceError> {
        let mut entry = self.get_entry(id).await?;
        entry.replace(input, Utc::now())?;
        self.storage.save_journal_entry(&entry).await?;
        Ok(entry)
    }

    pub async fn delete_entry(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(self.storage.delete_journal_entry(id).await?)
    }
}
