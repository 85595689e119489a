//! In-process storage backend.
//!
//! Used when no `DATABASE_URL` is configured and by the service/http tests.
//! All state lives behind one `RwLock`, so every trait method is atomic with
//! respect to the others, mirroring what the PostgreSQL backend gets from
//! single statements and transactions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use therapy_core::{
    JournalEntry, Notification, NotificationKey, Profile, Prompt, Session, SessionMessage, Task,
};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::{
    JournalStore, NotificationStore, ProfileStore, PromptStore, SessionStore, TaskStore,
};

#[derive(Debug, Default)]
struct MemoryState {
    profiles: HashMap<String, Profile>,
    sessions: HashMap<String, Session>,
    tasks: HashMap<String, Task>,
    journal: HashMap<String, JournalEntry>,
    notifications: HashMap<String, Notification>,
    notification_keys: HashSet<NotificationKey>,
    prompts: HashMap<String, Prompt>,
}

impl MemoryState {
    fn remove_pending_for(&mut self, related_id: &str) -> usize {
        let doomed: Vec<String> = self
            .notifications
            .values()
            .filter(|n| !n.sent && n.related_id == related_id)
            .map(|n| n.id.clone())
            .collect();
        for id in &doomed {
            if let Some(n) = self.notifications.remove(id) {
                self.notification_keys.remove(&n.key());
            }
        }
        doomed.len()
    }
}

/// Cheaply cloneable handle; clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<MemoryState>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn take_sorted<T, K: Ord>(mut items: Vec<T>, limit: usize, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items.truncate(limit);
    items
}

#[async_trait]
impl ProfileStore for MemoryStorage {
    async fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        let mut state = self.inner.write().await;
        let mut stored = profile.clone();
        // Counters belong to record_session_started/removed.
        if let Some(existing) = state.profiles.get(&profile.id) {
            stored.session_count = existing.session_count;
            stored.last_session_at = existing.last_session_at;
        }
        state.profiles.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StorageError> {
        Ok(self.inner.read().await.profiles.get(id).cloned())
    }

    async fn list_profiles(&self, user_id: &str, limit: usize) -> Result<Vec<Profile>, StorageError> {
        let state = self.inner.read().await;
        let items = state.profiles.values().filter(|p| p.user_id == user_id).cloned().collect();
        Ok(take_sorted(items, limit, |p: &Profile| (std::cmp::Reverse(p.created_at), p.id.clone())))
    }

    async fn delete_profile(&self, id: &str) -> Result<bool, StorageError> {
        let mut state = self.inner.write().await;
        if state.profiles.remove(id).is_none() {
            return Ok(false);
        }
        let related: Vec<String> = state
            .sessions
            .values()
            .filter(|s| s.profile_id == id)
            .map(|s| s.id.clone())
            .chain(state.tasks.values().filter(|t| t.profile_id == id).map(|t| t.id.clone()))
            .collect();
        for related_id in &related {
            state.remove_pending_for(related_id);
        }
        state.sessions.retain(|_, s| s.profile_id != id);
        state.tasks.retain(|_, t| t.profile_id != id);
        state.journal.retain(|_, j| j.profile_id != id);
        Ok(true)
    }

    async fn record_session_started(
        &self,
        profile_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut state = self.inner.write().await;
        let profile = state
            .profiles
            .get_mut(profile_id)
            .ok_or_else(|| StorageError::not_found("profile", profile_id))?;
        profile.session_count = profile.session_count.saturating_add(1);
        profile.last_session_at = Some(profile.last_session_at.map_or(at, |prev| prev.max(at)));
        profile.updated_at = Utc::now();
        Ok(())
    }

    async fn record_session_removed(&self, profile_id: &str) -> Result<(), StorageError> {
        let mut state = self.inner.write().await;
        if let Some(profile) = state.profiles.get_mut(profile_id) {
            profile.session_count = profile.session_count.saturating_sub(1);
            profile.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStorage {
    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let mut state = self.inner.write().await;
        if !state.profiles.contains_key(&session.profile_id) {
            return Err(StorageError::not_found("profile", &session.profile_id));
        }
        state.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StorageError> {
        Ok(self.inner.read().await.sessions.get(id).cloned())
    }

    async fn list_sessions(&self, profile_id: &str, limit: usize) -> Result<Vec<Session>, StorageError> {
        let state = self.inner.read().await;
        let items = state.sessions.values().filter(|s| s.profile_id == profile_id).cloned().collect();
        Ok(take_sorted(items, limit, |s: &Session| (std::cmp::Reverse(s.started_at), s.id.clone())))
    }

    async fn append_session_message(
        &self,
        session_id: &str,
        message: &SessionMessage,
    ) -> Result<bool, StorageError> {
        let mut state = self.inner.write().await;
        match state.sessions.get_mut(session_id) {
            Some(session) if !session.completed => {
                session.messages.push(message.clone());
                session.updated_at = message.timestamp;
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    async fn complete_session(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
    ) -> Result<Option<Session>, StorageError> {
        let mut state = self.inner.write().await;
        match state.sessions.get_mut(id) {
            Some(session) if !session.completed => {
                session.complete(ended_at)?;
                Ok(Some(session.clone()))
            },
            _ => Ok(None),
        }
    }

    async fn delete_session(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.inner.write().await.sessions.remove(id).is_some())
    }

    async fn list_scheduled_sessions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>, StorageError> {
        let state = self.inner.read().await;
        let items: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| !s.completed && s.scheduled_for.is_some_and(|at| at >= from && at <= to))
            .cloned()
            .collect();
        Ok(take_sorted(items, usize::MAX, |s: &Session| (s.scheduled_for, s.id.clone())))
    }
}

#[async_trait]
impl TaskStore for MemoryStorage {
    async fn save_task(&self, task: &Task) -> Result<(), StorageError> {
        let mut state = self.inner.write().await;
        if !state.profiles.contains_key(&task.profile_id) {
            return Err(StorageError::not_found("profile", &task.profile_id));
        }
        state.tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, StorageError> {
        Ok(self.inner.read().await.tasks.get(id).cloned())
    }

    async fn list_tasks(
        &self,
        profile_id: &str,
        include_completed: bool,
    ) -> Result<Vec<Task>, StorageError> {
        let state = self.inner.read().await;
        let items = state
            .tasks
            .values()
            .filter(|t| t.profile_id == profile_id && (include_completed || !t.completed))
            .cloned()
            .collect();
        Ok(take_sorted(items, usize::MAX, |t: &Task| (t.due_date, t.id.clone())))
    }

    async fn delete_task(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.inner.write().await.tasks.remove(id).is_some())
    }

    async fn list_tasks_due(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, StorageError> {
        let state = self.inner.read().await;
        let items = state
            .tasks
            .values()
            .filter(|t| !t.completed && t.due_date >= from && t.due_date <= to)
            .cloned()
            .collect();
        Ok(take_sorted(items, usize::MAX, |t: &Task| (t.due_date, t.id.clone())))
    }
}

#[async_trait]
impl JournalStore for MemoryStorage {
    async fn save_journal_entry(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        let mut state = self.inner.write().await;
        if !state.profiles.contains_key(&entry.profile_id) {
            return Err(StorageError::not_found("profile", &entry.profile_id));
        }
        state.journal.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn get_journal_entry(&self, id: &str) -> Result<Option<JournalEntry>, StorageError> {
        Ok(self.inner.read().await.journal.get(id).cloned())
    }

    async fn list_journal_entries(
        &self,
        profile_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, StorageError> {
        let state = self.inner.read().await;
        let items = state.journal.values().filter(|j| j.profile_id == profile_id).cloned().collect();
        Ok(take_sorted(items, limit, |j: &JournalEntry| {
            (std::cmp::Reverse(j.created_at), j.id.clone())
        }))
    }

    async fn delete_journal_entry(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.inner.write().await.journal.remove(id).is_some())
    }
}

#[async_trait]
impl NotificationStore for MemoryStorage {
    async fn insert_notification_if_absent(
        &self,
        notification: &Notification,
    ) -> Result<bool, StorageError> {
        let mut state = self.inner.write().await;
        if !state.notification_keys.insert(notification.key()) {
            return Ok(false);
        }
        state.notifications.insert(notification.id.clone(), notification.clone());
        Ok(true)
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Notification>, StorageError> {
        let state = self.inner.read().await;
        let items = state.notifications.values().filter(|n| n.user_id == user_id).cloned().collect();
        Ok(take_sorted(items, limit, |n: &Notification| {
            (std::cmp::Reverse(n.scheduled_for), n.id.clone())
        }))
    }

    async fn list_due_notifications(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Notification>, StorageError> {
        let state = self.inner.read().await;
        let items = state.notifications.values().filter(|n| n.is_due(now)).cloned().collect();
        Ok(take_sorted(items, limit, |n: &Notification| {
            (n.last_attempt_at, n.scheduled_for, n.id.clone())
        }))
    }

    async fn mark_notification_sent(
        &self,
        id: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut state = self.inner.write().await;
        match state.notifications.get_mut(id) {
            Some(n) if !n.sent => {
                n.sent = true;
                n.sent_at = Some(sent_at);
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    async fn record_delivery_failure(
        &self,
        id: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut state = self.inner.write().await;
        match state.notifications.get_mut(id) {
            Some(n) if !n.sent => {
                n.record_failed_attempt(attempted_at);
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    async fn delete_pending_notifications(&self, related_id: &str) -> Result<usize, StorageError> {
        Ok(self.inner.write().await.remove_pending_for(related_id))
    }
}

#[async_trait]
impl PromptStore for MemoryStorage {
    async fn save_prompt(&self, prompt: &Prompt) -> Result<(), StorageError> {
        let mut state = self.inner.write().await;
        if state.prompts.values().any(|p| p.name == prompt.name && p.id != prompt.id) {
            return Err(StorageError::Duplicate(format!("prompt name {}", prompt.name)));
        }
        state.prompts.insert(prompt.id.clone(), prompt.clone());
        Ok(())
    }

    async fn get_prompt(&self, id: &str) -> Result<Option<Prompt>, StorageError> {
        Ok(self.inner.read().await.prompts.get(id).cloned())
    }

    async fn get_prompt_by_name(&self, name: &str) -> Result<Option<Prompt>, StorageError> {
        Ok(self.inner.read().await.prompts.values().find(|p| p.name == name).cloned())
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError> {
        let state = self.inner.read().await;
        let items = state.prompts.values().cloned().collect();
        Ok(take_sorted(items, usize::MAX, |p: &Prompt| p.name.clone()))
    }

    async fn delete_prompt(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.inner.write().await.prompts.remove(id).is_some())
    }
}
