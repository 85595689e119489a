#![expect(clippy::unwrap_used, reason = "test code")]

use chrono::{Duration, Utc};
use therapy_core::{ProfileInput, TaskInput, TaskUpdate};
use therapy_storage::traits::NotificationStore;

use super::{build_services, reminder_service};

#[tokio::test]
async fn test_completing_task_drops_pending_reminders() {
    let dir = tempfile::tempdir().unwrap();
    let services = build_services(None, dir.path());
    let profile = services
        .profiles
        .create_profile(ProfileInput {
            user_id: "user-1".to_owned(),
            name: "Kim".to_owned(),
            description: None,
            goals: vec![],
            challenges: vec![],
            preferred_method: None,
        })
        .await
        .unwrap();

    let now = Utc::now();
    let task = services
        .tasks
        .create_task(
            &profile.id,
            TaskInput { title: "Thought record".to_owned(), description: None, due_date: now + Duration::hours(36) },
        )
        .await
        .unwrap();

    let report = reminder_service(&services.storage).create_task_reminders(now).await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(services.storage.list_notifications("user-1", 10).await.unwrap().len(), 1);

    let done = services.tasks.set_completed(&task.id, true).await.unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());
    assert!(services.storage.list_notifications("user-1", 10).await.unwrap().is_empty());

    let reopened = services.tasks.set_completed(&task.id, false).await.unwrap();
    assert!(!reopened.completed);
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
async fn test_moving_due_date_replans_reminder() {
    let dir = tempfile::tempdir().unwrap();
    let services = build_services(None, dir.path());
    let profile = services
        .profiles
        .create_profile(ProfileInput {
            user_id: "user-2".to_owned(),
            name: "Lee".to_owned(),
            description: None,
            goals: vec![],
            challenges: vec![],
            preferred_method: None,
        })
        .await
        .unwrap();

    let now = Utc::now();
    let task = services
        .tasks
        .create_task(
            &profile.id,
            TaskInput { title: "Journal".to_owned(), description: None, due_date: now + Duration::hours(30) },
        )
        .await
        .unwrap();
    let reminders = reminder_service(&services.storage);
    reminders.create_task_reminders(now).await.unwrap();

    services
        .tasks
        .update_task(&task.id, TaskUpdate { due_date: Some(now + Duration::hours(40)), ..Default::default() })
        .await
        .unwrap();
    assert!(services.storage.list_notifications("user-2", 10).await.unwrap().is_empty());

    reminders.create_task_reminders(now).await.unwrap();
    let notifications = services.storage.list_notifications("user-2", 10).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].scheduled_for, now + Duration::hours(16));

    assert!(services.tasks.delete_task(&task.id).await.unwrap());
    assert!(services.storage.list_notifications("user-2", 10).await.unwrap().is_empty());
}
