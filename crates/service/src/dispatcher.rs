//! Delivery of due notifications.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use therapy_core::{DISPATCH_BATCH_LIMIT, Notification};
use therapy_storage::StorageBackend;
use therapy_storage::traits::NotificationStore;

use crate::ServiceError;

/// Transport for a single notification. Implementations report failure with
/// any error; the notification then stays unsent and is retried on a later
/// tick, after notifications that have not been attempted yet.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSender;

#[async_trait]
impl NotificationSender for TracingSender {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            notification_type = %notification.notification_type,
            scheduled_for = %notification.scheduled_for,
            title = %notification.title,
            "Notification: {}",
            notification.message
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    /// Marked sent by a concurrent dispatcher between fetch and mark.
    pub already_sent: usize,
}

pub struct NotificationDispatcher {
    storage: Arc<StorageBackend>,
    sender: Arc<dyn NotificationSender>,
    batch_limit: usize,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, sender: Arc<dyn NotificationSender>) -> Self {
        Self { storage, sender, batch_limit: DISPATCH_BATCH_LIMIT }
    }

    #[must_use]
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit.max(1);
        self
    }

    /// Sends every unsent notification scheduled at or before `now`, up to
    /// the batch limit.
    pub async fn dispatch_due(&self, now: DateTime<Utc>) -> Result<DispatchReport, ServiceError> {
        let due = self.storage.list_due_notifications(now, self.batch_limit).await?;
        let mut report = DispatchReport::default();

        for notification in &due {
            if let Err(e) = self.sender.send(notification).await {
                report.failed += 1;
                tracing::warn!(
                    notification_id = %notification.id,
                    attempts = notification.delivery_attempts.saturating_add(1),
                    error = %e,
                    "Notification delivery failed"
                );
                if let Err(e) = self.storage.record_delivery_failure(&notification.id, now).await {
                    tracing::warn!(notification_id = %notification.id, error = %e, "Failed to record delivery attempt");
                }
                continue;
            }
            match self.storage.mark_notification_sent(&notification.id, now).await {
                Ok(true) => report.sent += 1,
                Ok(false) => report.already_sent += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(notification_id = %notification.id, error = %e, "Failed to mark notification sent");
                },
            }
        }

        if !due.is_empty() {
            tracing::info!(sent = report.sent, failed = report.failed, "Sent scheduled notifications");
        }
        Ok(report)
    }
}
