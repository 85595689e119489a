//! TaskStore implementation for PgStorage.

use super::*;

use crate::traits::TaskStore;
use async_trait::async_trait;

#[async_trait]
impl TaskStore for PgStorage {
    async fn save_task(&self, task: &Task) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO tasks ({TASK_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
             ON CONFLICT (id) DO UPDATE SET
               title = EXCLUDED.title,
               description = EXCLUDED.description,
               due_date = EXCLUDED.due_date,
               completed = EXCLUDED.completed,
               completed_at = EXCLUDED.completed_at,
               updated_at = EXCLUDED.updated_at"
        ))
        .bind(&task.id)
        .bind(&task.user_id)
        .bind(&task.profile_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.completed)
        .bind(task.completed_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, StorageError> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_task(&r)).transpose()
    }

    async fn list_tasks(
        &self,
        profile_id: &str,
        include_completed: bool,
    ) -> Result<Vec<Task>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE profile_id = $1 AND ($2 OR completed = FALSE)
             ORDER BY due_date ASC, id ASC"
        ))
        .bind(profile_id)
        .bind(include_completed)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_task).collect()
    }

    async fn delete_task(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks_due(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Task>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE completed = FALSE AND due_date >= $1 AND due_date <= $2
             ORDER BY due_date ASC, id ASC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_task).collect()
    }
}
