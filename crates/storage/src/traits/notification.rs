use async_trait::async_trait;
use chrono::{DateTime, Utc};
use therapy_core::Notification;

use crate::error::StorageError;

/// Notification persistence.
///
/// `(user_id, notification_type, related_id, scheduled_for)` is unique; every
/// backend enforces it atomically.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert unless a notification with the same key exists.
    /// Returns `true` if a row was created.
    async fn insert_notification_if_absent(
        &self,
        notification: &Notification,
    ) -> Result<bool, StorageError>;

    /// Notifications of a user, latest schedule first.
    async fn list_notifications(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Notification>, StorageError>;

    /// Unsent notifications with `scheduled_for <= now`.
    ///
    /// Never-attempted notifications come first, then the least recently
    /// failed ones, each group earliest schedule first. Failing deliveries
    /// therefore cannot hold the head of every batch.
    async fn list_due_notifications(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Notification>, StorageError>;

    /// Returns `false` if the notification is missing or already sent.
    async fn mark_notification_sent(
        &self,
        id: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Bump the attempt counter of an unsent notification.
    /// Returns `false` if the notification is missing or already sent.
    async fn record_delivery_failure(
        &self,
        id: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Drop unsent notifications pointing at a deleted session or task.
    async fn delete_pending_notifications(&self, related_id: &str) -> Result<usize, StorageError>;
}
