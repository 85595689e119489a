use async_trait::async_trait;
use chrono::{DateTime, Utc};
use therapy_core::Task;

use crate::error::StorageError;

/// Task persistence.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn save_task(&self, task: &Task) -> Result<(), StorageError>;

    async fn get_task(&self, id: &str) -> Result<Option<Task>, StorageError>;

    /// Tasks of a profile ordered by due date.
    async fn list_tasks(
        &self,
        profile_id: &str,
        include_completed: bool,
    ) -> Result<Vec<Task>, StorageError>;

    async fn delete_task(&self, id: &str) -> Result<bool, StorageError>;

    /// Incomplete tasks due in `[from, to]`, earliest first.
    async fn list_tasks_due(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, StorageError>;
}
