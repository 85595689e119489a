use std::sync::Arc;

use chrono::Utc;
use therapy_core::{EmotionalStateInput, Profile, ProfileInput, ProfileUpdate, find_therapy_method};
use therapy_storage::StorageBackend;
use therapy_storage::traits::ProfileStore;

use crate::ServiceError;

pub struct ProfileService {
    storage: Arc<StorageBackend>,
}

impl ProfileService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn create_profile(&self, mut input: ProfileInput) -> Result<Profile, ServiceError> {
        input.preferred_method = canonical_method(input.preferred_method)?;
        let profile = Profile::new(input, Utc::now())?;
        self.storage.save_profile(&profile).await?;
        tracing::info!(profile_id = %profile.id, user_id = %profile.user_id, "Profile created");
        Ok(profile)
    }

    pub async fn get_profile(&self, id: &str) -> Result<Profile, ServiceError> {
        self.storage.get_profile(id).await?.ok_or_else(|| ServiceError::not_found("profile", id))
    }

    pub async fn list_profiles(&self, user_id: &str, limit: usize) -> Result<Vec<Profile>, ServiceError> {
        Ok(self.storage.list_profiles(user_id, limit).await?)
    }

    pub async fn update_profile(
        &self,
        id: &str,
        mut update: ProfileUpdate,
    ) -> Result<Profile, ServiceError> {
        update.preferred_method = canonical_method(update.preferred_method)?;
        let mut profile = self.get_profile(id).await?;
        profile.apply_update(update, Utc::now())?;
        self.storage.save_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn add_emotional_state(
        &self,
        id: &str,
        input: EmotionalStateInput,
    ) -> Result<Profile, ServiceError> {
        let now = Utc::now();
        let state = input.into_state(now)?;
        let mut profile = self.get_profile(id).await?;
        profile.emotional_states.push(state);
        profile.updated_at = now;
        self.storage.save_profile(&profile).await?;
        Ok(profile)
    }

    /// Removes the profile with everything hanging off it.
    pub async fn delete_profile(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.storage.delete_profile(id).await?;
        if deleted {
            tracing::info!(profile_id = %id, "Profile deleted");
        }
        Ok(deleted)
    }
}

/// Normalizes a method key to its catalogue spelling.
pub(crate) fn canonical_method(method: Option<String>) -> Result<Option<String>, ServiceError> {
    method
        .map(|key| {
            find_therapy_method(&key)
                .map(|m| m.key.to_owned())
                .ok_or_else(|| ServiceError::InvalidInput(format!("unknown therapy method: {key}")))
        })
        .transpose()
}
