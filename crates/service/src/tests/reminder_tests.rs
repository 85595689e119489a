#![expect(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use therapy_core::{NotificationType, Profile, ProfileInput, Session, Task, TaskInput};
use therapy_storage::StorageBackend;
use therapy_storage::traits::{NotificationStore, ProfileStore, SessionStore, TaskStore};

use super::{at, reminder_service};
use crate::ReminderRunReport;

async fn seed_profile(storage: &StorageBackend) -> Profile {
    let profile = Profile::new(
        ProfileInput {
            user_id: "user-1".to_owned(),
            name: "Robin".to_owned(),
            description: None,
            goals: vec![],
            challenges: vec![],
            preferred_method: None,
        },
        at(2024, 3, 1, 0, 0),
    )
    .unwrap();
    storage.save_profile(&profile).await.unwrap();
    profile
}

async fn seed_session(storage: &StorageBackend, profile: &Profile, starts: DateTime<Utc>) -> Session {
    let session = Session::new(
        profile.user_id.clone(),
        profile.id.clone(),
        None,
        Some(starts),
        at(2024, 3, 1, 0, 0),
    );
    storage.save_session(&session).await.unwrap();
    session
}

async fn seed_task(storage: &StorageBackend, profile: &Profile, due: DateTime<Utc>) -> Task {
    let task = Task::new(
        profile.user_id.clone(),
        profile.id.clone(),
        TaskInput { title: "Gratitude list".to_owned(), description: None, due_date: due },
        at(2024, 3, 1, 0, 0),
    )
    .unwrap();
    storage.save_task(&task).await.unwrap();
    task
}

#[tokio::test]
async fn test_session_reminder_created_once() {
    let storage = Arc::new(StorageBackend::new_memory());
    let profile = seed_profile(&storage).await;
    let session = seed_session(&storage, &profile, at(2024, 3, 1, 14, 0)).await;
    let service = reminder_service(&storage);
    let now = at(2024, 3, 1, 12, 30);

    let first = service.create_session_reminders(now).await.unwrap();
    assert_eq!(first, ReminderRunReport { created: 1, ..Default::default() });

    let second = service.create_session_reminders(now).await.unwrap();
    assert_eq!(second, ReminderRunReport { already_present: 1, ..Default::default() });

    let notifications = storage.list_notifications("user-1", 10).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].related_id, session.id);
    assert_eq!(notifications[0].notification_type, NotificationType::SessionReminder);
    assert_eq!(notifications[0].scheduled_for, at(2024, 3, 1, 13, 0));
    assert!(!notifications[0].sent);
}

#[tokio::test]
async fn test_session_reminder_in_past_is_skipped() {
    let storage = Arc::new(StorageBackend::new_memory());
    let profile = seed_profile(&storage).await;
    seed_session(&storage, &profile, at(2024, 3, 1, 13, 0)).await;

    let report = reminder_service(&storage).create_session_reminders(at(2024, 3, 1, 12, 30)).await.unwrap();
    assert_eq!(report, ReminderRunReport { skipped: 1, ..Default::default() });
    assert!(storage.list_notifications("user-1", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_task_due_tomorrow_midnight_gets_no_reminder() {
    let storage = Arc::new(StorageBackend::new_memory());
    let profile = seed_profile(&storage).await;
    seed_task(&storage, &profile, at(2024, 3, 2, 0, 0)).await;

    let report = reminder_service(&storage).create_task_reminders(at(2024, 3, 1, 10, 0)).await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.skipped, 2);
}

#[tokio::test]
async fn test_task_due_today_fires_at_nine_even_when_late() {
    let storage = Arc::new(StorageBackend::new_memory());
    let profile = seed_profile(&storage).await;
    let task = seed_task(&storage, &profile, at(2024, 3, 1, 18, 0)).await;

    let report = reminder_service(&storage).create_task_reminders(at(2024, 3, 1, 10, 0)).await.unwrap();
    assert_eq!(report.created, 1);

    let notifications = storage.list_notifications("user-1", 10).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].related_id, task.id);
    assert_eq!(notifications[0].notification_type, NotificationType::TaskDueToday);
    assert_eq!(notifications[0].scheduled_for, at(2024, 3, 1, 9, 0));
}

#[tokio::test]
async fn test_task_gets_both_reminders() {
    let storage = Arc::new(StorageBackend::new_memory());
    let profile = seed_profile(&storage).await;
    // lead reminder lands at 20:00 today; due-today at 09:00 tomorrow is
    // planned on tomorrow's run
    seed_task(&storage, &profile, at(2024, 3, 2, 20, 0)).await;
    let service = reminder_service(&storage);

    let today = service.create_task_reminders(at(2024, 3, 1, 10, 0)).await.unwrap();
    assert_eq!(today.created, 1);

    let tomorrow = service.create_task_reminders(at(2024, 3, 2, 8, 5)).await.unwrap();
    assert_eq!(tomorrow.created, 1);

    let mut types: Vec<NotificationType> = storage
        .list_notifications("user-1", 10)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.notification_type)
        .collect();
    types.sort();
    assert_eq!(types, vec![NotificationType::TaskDueSoon, NotificationType::TaskDueToday]);
}

#[tokio::test]
async fn test_overlapping_runs_create_each_reminder_once() {
    let storage = Arc::new(StorageBackend::new_memory());
    let profile = seed_profile(&storage).await;
    for hour in [14, 16, 18] {
        seed_session(&storage, &profile, at(2024, 3, 1, hour, 0)).await;
    }
    let service = Arc::new(reminder_service(&storage));
    let now = at(2024, 3, 1, 12, 30);

    let mut handles = vec![];
    for _ in 0..4 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move { service.create_reminders(now).await.unwrap() }));
    }
    let mut total = ReminderRunReport::default();
    for handle in handles {
        total = total.merge(handle.await.unwrap());
    }

    assert_eq!(total.created, 3);
    assert_eq!(total.already_present, 9);
    assert_eq!(storage.list_notifications("user-1", 10).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_completed_sessions_and_far_sessions_ignored() {
    let storage = Arc::new(StorageBackend::new_memory());
    let profile = seed_profile(&storage).await;
    let mut done = seed_session(&storage, &profile, at(2024, 3, 1, 15, 0)).await;
    done.complete(at(2024, 3, 1, 12, 0)).unwrap();
    storage.save_session(&done).await.unwrap();
    seed_session(&storage, &profile, at(2024, 3, 1, 12, 30) + Duration::hours(30)).await;

    let report = reminder_service(&storage).create_reminders(at(2024, 3, 1, 12, 30)).await.unwrap();
    assert_eq!(report.created, 0);
    assert!(storage.list_notifications("user-1", 10).await.unwrap().is_empty());
}
