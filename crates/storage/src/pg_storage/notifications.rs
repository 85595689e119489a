//! NotificationStore implementation for PgStorage.

use super::*;

use crate::traits::NotificationStore;
use async_trait::async_trait;

#[async_trait]
impl NotificationStore for PgStorage {
    async fn insert_notification_if_absent(
        &self,
        notification: &Notification,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(&format!(
            "INSERT INTO notifications ({NOTIFICATION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
             ON CONFLICT ON CONSTRAINT uq_notifications_key DO NOTHING"
        ))
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(notification.notification_type.as_str())
        .bind(&notification.related_id)
        .bind(notification.scheduled_for)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.sent)
        .bind(notification.sent_at)
        .bind(i32::try_from(notification.delivery_attempts).unwrap_or(i32::MAX))
        .bind(notification.last_attempt_at)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Notification>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1
             ORDER BY scheduled_for DESC, id ASC LIMIT $2"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_notification).collect()
    }

    async fn list_due_notifications(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Notification>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE sent = FALSE AND scheduled_for <= $1
             ORDER BY last_attempt_at ASC NULLS FIRST, scheduled_for ASC, id ASC LIMIT $2"
        ))
        .bind(now)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_notification).collect()
    }

    async fn mark_notification_sent(
        &self,
        id: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE notifications SET sent = TRUE, sent_at = $2 WHERE id = $1 AND sent = FALSE",
        )
        .bind(id)
        .bind(sent_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_delivery_failure(
        &self,
        id: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE notifications SET delivery_attempts = delivery_attempts + 1, last_attempt_at = $2
             WHERE id = $1 AND sent = FALSE",
        )
        .bind(id)
        .bind(attempted_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_pending_notifications(&self, related_id: &str) -> Result<usize, StorageError> {
        let result = sqlx::query("DELETE FROM notifications WHERE related_id = $1 AND sent = FALSE")
            .bind(related_id)
            .execute(&self.pool)
            .await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }
}
