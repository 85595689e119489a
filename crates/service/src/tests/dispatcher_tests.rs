#![expect(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use therapy_core::{Notification, NotificationType};
use therapy_storage::StorageBackend;
use therapy_storage::traits::NotificationStore;

use super::at;
use crate::{DispatchReport, NotificationDispatcher, NotificationSender, TracingSender};

fn notification(related_id: &str, minutes_from_base: i64) -> Notification {
    Notification {
        id: therapy_core::new_id(),
        user_id: "user-1".to_owned(),
        notification_type: NotificationType::TaskDueSoon,
        related_id: related_id.to_owned(),
        scheduled_for: at(2024, 3, 1, 12, 0) + Duration::minutes(minutes_from_base),
        title: "Task due soon".to_owned(),
        message: "Soon".to_owned(),
        sent: false,
        sent_at: None,
        delivery_attempts: 0,
        last_attempt_at: None,
        created_at: at(2024, 3, 1, 0, 0),
    }
}

/// Fails for related ids starting with a prefix, succeeds otherwise.
struct FlakySender {
    failing_prefix: String,
    calls: AtomicUsize,
}

impl FlakySender {
    fn failing(prefix: &str) -> Arc<Self> {
        Arc::new(Self { failing_prefix: prefix.to_owned(), calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl NotificationSender for FlakySender {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if notification.related_id.starts_with(&self.failing_prefix) {
            anyhow::bail!("smtp unavailable");
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_dispatch_sends_only_due() {
    let storage = Arc::new(StorageBackend::new_memory());
    let due = notification("a", -5);
    let future = notification("b", 5);
    storage.insert_notification_if_absent(&due).await.unwrap();
    storage.insert_notification_if_absent(&future).await.unwrap();

    let dispatcher = NotificationDispatcher::new(Arc::clone(&storage), Arc::new(TracingSender));
    let now = at(2024, 3, 1, 12, 0);
    let report = dispatcher.dispatch_due(now).await.unwrap();
    assert_eq!(report, DispatchReport { sent: 1, ..Default::default() });

    let stored = storage.list_notifications("user-1", 10).await.unwrap();
    let sent = stored.iter().find(|n| n.id == due.id).unwrap();
    assert!(sent.sent);
    assert_eq!(sent.sent_at, Some(now));
    assert!(!stored.iter().find(|n| n.id == future.id).unwrap().sent);

    let again = dispatcher.dispatch_due(now).await.unwrap();
    assert_eq!(again, DispatchReport::default());
}

#[tokio::test]
async fn test_failed_delivery_stays_unsent() {
    let storage = Arc::new(StorageBackend::new_memory());
    storage.insert_notification_if_absent(&notification("ok", -10)).await.unwrap();
    storage.insert_notification_if_absent(&notification("broken", -5)).await.unwrap();

    let sender = FlakySender::failing("broken");
    let dispatcher = NotificationDispatcher::new(Arc::clone(&storage), Arc::clone(&sender) as Arc<dyn NotificationSender>);
    let now = at(2024, 3, 1, 12, 0);

    let report = dispatcher.dispatch_due(now).await.unwrap();
    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 1);

    // retried on the next tick
    let report = dispatcher.dispatch_due(now + Duration::minutes(1)).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(sender.calls.load(Ordering::SeqCst), 3);
    assert_eq!(storage.list_due_notifications(now, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failing_notifications_rotate_behind_untried_ones() {
    let storage = Arc::new(StorageBackend::new_memory());
    let bad_first = notification("bad-1", -30);
    let bad_second = notification("bad-2", -20);
    let good = notification("good", -10);
    for n in [&bad_first, &bad_second, &good] {
        storage.insert_notification_if_absent(n).await.unwrap();
    }

    let sender = FlakySender::failing("bad");
    let dispatcher =
        NotificationDispatcher::new(Arc::clone(&storage), Arc::clone(&sender) as Arc<dyn NotificationSender>)
            .with_batch_limit(2);
    let now = at(2024, 3, 1, 12, 0);

    let report = dispatcher.dispatch_due(now).await.unwrap();
    assert_eq!(report, DispatchReport { failed: 2, ..Default::default() });

    let report = dispatcher.dispatch_due(now + Duration::minutes(1)).await.unwrap();
    assert_eq!(report, DispatchReport { sent: 1, failed: 1, already_sent: 0 });

    let stored = storage.list_notifications("user-1", 10).await.unwrap();
    let find = |id: &str| stored.iter().find(|n| n.id == id).unwrap();
    assert!(find(&good.id).sent);
    assert_eq!(find(&bad_first.id).delivery_attempts, 2);
    assert_eq!(find(&bad_first.id).last_attempt_at, Some(now + Duration::minutes(1)));
    assert_eq!(find(&bad_second.id).delivery_attempts, 1);
    assert!(!find(&bad_second.id).sent);

    // the older failure goes next
    let due = storage.list_due_notifications(now + Duration::minutes(2), 1).await.unwrap();
    assert_eq!(due[0].id, bad_second.id);
    assert_eq!(sender.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_batch_limit_bounds_one_tick() {
    let storage = Arc::new(StorageBackend::new_memory());
    for i in 0..5 {
        storage.insert_notification_if_absent(&notification(&format!("n{i}"), -i)).await.unwrap();
    }
    let dispatcher =
        NotificationDispatcher::new(Arc::clone(&storage), Arc::new(TracingSender)).with_batch_limit(2);
    let now = at(2024, 3, 1, 12, 0);

    assert_eq!(dispatcher.dispatch_due(now).await.unwrap().sent, 2);
    assert_eq!(dispatcher.dispatch_due(now).await.unwrap().sent, 2);
    assert_eq!(dispatcher.dispatch_due(now).await.unwrap().sent, 1);
    assert_eq!(dispatcher.dispatch_due(now).await.unwrap().sent, 0);
}
