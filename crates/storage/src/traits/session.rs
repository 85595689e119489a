use async_trait::async_trait;
use chrono::{DateTime, Utc};
use therapy_core::{Session, SessionMessage};

use crate::error::StorageError;

/// Session lifecycle operations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save or replace a session.
    async fn save_session(&self, session: &Session) -> Result<(), StorageError>;

    /// Get session by ID.
    async fn get_session(&self, id: &str) -> Result<Option<Session>, StorageError>;

    /// Sessions of a profile, most recent start first.
    async fn list_sessions(&self, profile_id: &str, limit: usize) -> Result<Vec<Session>, StorageError>;

    /// Atomically append a message to an open session.
    ///
    /// Returns `false` when the session does not exist or is completed.
    async fn append_session_message(
        &self,
        session_id: &str,
        message: &SessionMessage,
    ) -> Result<bool, StorageError>;

    /// Close an open session, computing its metrics from the stored messages.
    ///
    /// Check and write happen atomically. Returns `None` when the session does
    /// not exist or was already completed.
    async fn complete_session(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
    ) -> Result<Option<Session>, StorageError>;

    /// Delete session. Returns `true` if a row was deleted.
    async fn delete_session(&self, id: &str) -> Result<bool, StorageError>;

    /// Open sessions with `scheduled_for` in `[from, to]`, earliest first.
    async fn list_scheduled_sessions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>, StorageError>;
}
