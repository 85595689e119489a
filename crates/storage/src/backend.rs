//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use therapy_core::{JournalEntry, Notification, Profile, Prompt, Session, SessionMessage, Task};

use crate::error::StorageError;
use crate::traits::{
    JournalStore, NotificationStore, ProfileStore, PromptStore, SessionStore, TaskStore,
};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Postgres(s) => <crate::pg_storage::PgStorage as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Memory(s) => <crate::memory::MemoryStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Postgres(crate::pg_storage::PgStorage),
    Memory(crate::memory::MemoryStorage),
}

impl StorageBackend {
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(crate::pg_storage::PgStorage::new(database_url).await?))
    }

    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(crate::memory::MemoryStorage::new())
    }

    /// PostgreSQL when a URL is given, otherwise the in-process store.
    pub async fn connect(database_url: Option<&str>) -> Result<Self, StorageError> {
        match database_url {
            Some(url) => Self::new_postgres(url).await,
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory storage (data is not persisted)");
                Ok(Self::new_memory())
            },
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

// ── ProfileStore ─────────────────────────────────────────────────

#[async_trait]
impl ProfileStore for StorageBackend {
    async fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        dispatch!(self, ProfileStore, save_profile(profile))
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StorageError> {
        dispatch!(self, ProfileStore, get_profile(id))
    }

    async fn list_profiles(&self, user_id: &str, limit: usize) -> Result<Vec<Profile>, StorageError> {
        dispatch!(self, ProfileStore, list_profiles(user_id, limit))
    }

    async fn delete_profile(&self, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, ProfileStore, delete_profile(id))
    }

    async fn record_session_started(
        &self,
        profile_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        dispatch!(self, ProfileStore, record_session_started(profile_id, at))
    }

    async fn record_session_removed(&self, profile_id: &str) -> Result<(), StorageError> {
        dispatch!(self, ProfileStore, record_session_removed(profile_id))
    }
}

// ── SessionStore ─────────────────────────────────────────────────

#[async_trait]
impl SessionStore for StorageBackend {
    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        dispatch!(self, SessionStore, save_session(session))
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StorageError> {
        dispatch!(self, SessionStore, get_session(id))
    }

    async fn list_sessions(&self, profile_id: &str, limit: usize) -> Result<Vec<Session>, StorageError> {
        dispatch!(self, SessionStore, list_sessions(profile_id, limit))
    }

    async fn append_session_message(
        &self,
        session_id: &str,
        message: &SessionMessage,
    ) -> Result<bool, StorageError> {
        dispatch!(self, SessionStore, append_session_message(session_id, message))
    }

    async fn complete_session(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
    ) -> Result<Option<Session>, StorageError> {
        dispatch!(self, SessionStore, complete_session(id, ended_at))
    }

    async fn delete_session(&self, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, SessionStore, delete_session(id))
    }

    async fn list_scheduled_sessions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>, StorageError> {
        dispatch!(self, SessionStore, list_scheduled_sessions(from, to))
    }
}

// ── TaskStore ────────────────────────────────────────────────────

#[async_trait]
impl TaskStore for StorageBackend {
    async fn save_task(&self, task: &Task) -> Result<(), StorageError> {
        dispatch!(self, TaskStore, save_task(task))
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, StorageError> {
        dispatch!(self, TaskStore, get_task(id))
    }

    async fn list_tasks(
        &self,
        profile_id: &str,
        include_completed: bool,
    ) -> Result<Vec<Task>, StorageError> {
        dispatch!(self, TaskStore, list_tasks(profile_id, include_completed))
    }

    async fn delete_task(&self, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, TaskStore, delete_task(id))
    }

    async fn list_tasks_due(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, StorageError> {
        dispatch!(self, TaskStore, list_tasks_due(from, to))
    }
}

// ── JournalStore ─────────────────────────────────────────────────

#[async_trait]
impl JournalStore for StorageBackend {
    async fn save_journal_entry(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        dispatch!(self, JournalStore, save_journal_entry(entry))
    }

    async fn get_journal_entry(&self, id: &str) -> Result<Option<JournalEntry>, StorageError> {
        dispatch!(self, JournalStore, get_journal_entry(id))
    }

    async fn list_journal_entries(
        &self,
        profile_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, StorageError> {
        dispatch!(self, JournalStore, list_journal_entries(profile_id, limit))
    }

    async fn delete_journal_entry(&self, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, JournalStore, delete_journal_entry(id))
    }
}

// ── NotificationStore ────────────────────────────────────────────

#[async_trait]
impl NotificationStore for StorageBackend {
    async fn insert_notification_if_absent(
        &self,
        notification: &Notification,
    ) -> Result<bool, StorageError> {
        dispatch!(self, NotificationStore, insert_notification_if_absent(notification))
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Notification>, StorageError> {
        dispatch!(self, NotificationStore, list_notifications(user_id, limit))
    }

    async fn list_due_notifications(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Notification>, StorageError> {
        dispatch!(self, NotificationStore, list_due_notifications(now, limit))
    }

    async fn mark_notification_sent(
        &self,
        id: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        dispatch!(self, NotificationStore, mark_notification_sent(id, sent_at))
    }

    async fn record_delivery_failure(
        &self,
        id: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        dispatch!(self, NotificationStore, record_delivery_failure(id, attempted_at))
    }

    async fn delete_pending_notifications(&self, related_id: &str) -> Result<usize, StorageError> {
        dispatch!(self, NotificationStore, delete_pending_notifications(related_id))
    }
}

// ── PromptStore ──────────────────────────────────────────────────

#[async_trait]
impl PromptStore for StorageBackend {
    async fn save_prompt(&self, prompt: &Prompt) -> Result<(), StorageError> {
        dispatch!(self, PromptStore, save_prompt(prompt))
    }

    async fn get_prompt(&self, id: &str) -> Result<Option<Prompt>, StorageError> {
        dispatch!(self, PromptStore, get_prompt(id))
    }

    async fn get_prompt_by_name(&self, name: &str) -> Result<Option<Prompt>, StorageError> {
        dispatch!(self, PromptStore, get_prompt_by_name(name))
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError> {
        dispatch!(self, PromptStore, list_prompts())
    }

    async fn delete_prompt(&self, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, PromptStore, delete_prompt(id))
    }
}
