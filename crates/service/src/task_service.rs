use std::sync::Arc;

use chrono::Utc;
use therapy_core::{Task, TaskInput, TaskUpdate};
use therapy_storage::StorageBackend;
use therapy_storage::traits::{NotificationStore, ProfileStore, TaskStore};

use crate::ServiceError;

pub struct TaskService {
    storage: Arc<StorageBackend>,
}

impl TaskService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn create_task(&self, profile_id: &str, input: TaskInput) -> Result<Task, ServiceError> {
        let profile = self
            .storage
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile", profile_id))?;
        let task = Task::new(profile.user_id, profile.id, input, Utc::now())?;
        self.storage.save_task(&task).await?;
        tracing::debug!(task_id = %task.id, due = %task.due_date, "Task created");
        Ok(task)
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, ServiceError> {
        self.storage.get_task(id).await?.ok_or_else(|| ServiceError::not_found("task", id))
    }

    pub async fn list_tasks(
        &self,
        profile_id: &str,
        include_completed: bool,
    ) -> Result<Vec<Task>, ServiceError> {
        Ok(self.storage.list_tasks(profile_id, include_completed).await?)
    }

    /// A moved due date invalidates reminders planned for the old one.
    pub async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task, ServiceError> {
        let mut task = self.get_task(id).await?;
        let previous_due = task.due_date;
        task.apply_update(update, Utc::now())?;
        self.storage.save_task(&task).await?;
        if task.due_date != previous_due {
            self.drop_pending_reminders(&task.id).await?;
        }
        Ok(task)
    }

    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<Task, ServiceError> {
        let mut task = self.get_task(id).await?;
        task.set_completed(completed, Utc::now());
        self.storage.save_task(&task).await?;
        if completed {
            self.drop_pending_reminders(&task.id).await?;
        }
        Ok(task)
    }

    pub async fn delete_task(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.storage.delete_task(id).await?;
        if deleted {
            self.drop_pending_reminders(id).await?;
        }
        Ok(deleted)
    }

    async fn drop_pending_reminders(&self, task_id: &str) -> Result<(), ServiceError> {
        let removed = self.storage.delete_pending_notifications(task_id).await?;
        if removed > 0 {
            tracing::debug!(task_id, removed, "Dropped pending task reminders");
        }
        Ok(())
    }
}
