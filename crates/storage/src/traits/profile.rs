use async_trait::async_trait;
use chrono::{DateTime, Utc};
use therapy_core::Profile;

use crate::error::StorageError;

/// Profile persistence, including the counters sessions keep up to date.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or replace a profile.
    async fn save_profile(&self, profile: &Profile) -> Result<(), StorageError>;

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StorageError>;

    /// Profiles owned by a user, newest first.
    async fn list_profiles(&self, user_id: &str, limit: usize) -> Result<Vec<Profile>, StorageError>;

    /// Delete a profile together with its sessions, tasks, journal entries and
    /// their unsent notifications. Returns `true` if the profile existed.
    async fn delete_profile(&self, id: &str) -> Result<bool, StorageError>;

    /// Bump `session_count` and set `last_session_at`.
    async fn record_session_started(
        &self,
        profile_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Decrement `session_count` (never below zero).
    async fn record_session_removed(&self, profile_id: &str) -> Result<(), StorageError>;
}
