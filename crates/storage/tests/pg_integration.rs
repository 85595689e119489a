//! Integration tests for PgStorage.
//! Run with: DATABASE_URL=... cargo test -p therapy-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use chrono::{Duration, DurationRound, Utc};
use therapy_core::{
    MessageRole, Notification, NotificationType, Profile, ProfileInput, Prompt, PromptInput,
    Session, SessionMessage, Task, TaskInput,
};
use therapy_storage::PgStorage;
use therapy_storage::traits::{
    NotificationStore, ProfileStore, PromptStore, SessionStore, TaskStore,
};

async fn create_pg_storage() -> PgStorage {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    PgStorage::new(&url).await.expect("Failed to connect to PostgreSQL")
}

fn unique_user() -> String {
    format!("test-{}", therapy_core::new_id())
}

// Postgres stores microseconds; keep test timestamps comparable.
fn now() -> chrono::DateTime<Utc> {
    Utc::now().duration_trunc(Duration::seconds(1)).unwrap()
}

async fn make_profile(storage: &PgStorage) -> Profile {
    let profile = Profile::new(
        ProfileInput {
            user_id: unique_user(),
            name: "Integration".to_owned(),
            description: Some("pg".to_owned()),
            goals: vec!["focus".to_owned()],
            challenges: vec!["stress".to_owned()],
            preferred_method: None,
        },
        now(),
    )
    .unwrap();
    storage.save_profile(&profile).await.unwrap();
    profile
}

fn make_notification(user_id: &str, related_id: &str, at: chrono::DateTime<Utc>) -> Notification {
    Notification {
        id: therapy_core::new_id(),
        user_id: user_id.to_owned(),
        notification_type: NotificationType::TaskDueSoon,
        related_id: related_id.to_owned(),
        scheduled_for: at,
        title: "Task due soon".to_owned(),
        message: "Your task is due soon".to_owned(),
        sent: false,
        sent_at: None,
        delivery_attempts: 0,
        last_attempt_at: None,
        created_at: now(),
    }
}

// ── Profile Tests ────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_profile_round_trip() {
    let storage = create_pg_storage().await;
    let profile = make_profile(&storage).await;

    let fetched = storage.get_profile(&profile.id).await.unwrap().unwrap();
    assert_eq!(fetched, profile);

    storage.record_session_started(&profile.id, now()).await.unwrap();
    let fetched = storage.get_profile(&profile.id).await.unwrap().unwrap();
    assert_eq!(fetched.session_count, 1);

    assert!(storage.delete_profile(&profile.id).await.unwrap());
    assert!(storage.get_profile(&profile.id).await.unwrap().is_none());
}

// ── Session Tests ────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_append_message_and_complete() {
    let storage = create_pg_storage().await;
    let profile = make_profile(&storage).await;
    let session = Session::new(profile.user_id.clone(), profile.id.clone(), None, None, now());
    storage.save_session(&session).await.unwrap();

    let msg = SessionMessage { role: MessageRole::User, content: "hi".to_owned(), timestamp: now() };
    assert!(storage.append_session_message(&session.id, &msg).await.unwrap());

    let stored = storage.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.messages, vec![msg.clone()]);
    let ended_at = now();
    let completed = storage.complete_session(&session.id, ended_at).await.unwrap().unwrap();
    assert_eq!(completed.metrics.unwrap().user_message_count, 1);
    assert!(storage.complete_session(&session.id, ended_at + Duration::hours(1)).await.unwrap().is_none());
    let stored = storage.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.ended_at, Some(ended_at));

    assert!(!storage.append_session_message(&session.id, &msg).await.unwrap());
    storage.delete_profile(&profile.id).await.unwrap();
}

// ── Notification Tests ───────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_notification_insert_if_absent() {
    let storage = create_pg_storage().await;
    let profile = make_profile(&storage).await;
    let task = Task::new(
        profile.user_id.clone(),
        profile.id.clone(),
        TaskInput { title: "walk".to_owned(), description: None, due_date: now() + Duration::days(1) },
        now(),
    )
    .unwrap();
    storage.save_task(&task).await.unwrap();

    let at = now() + Duration::hours(2);
    let first = make_notification(&profile.user_id, &task.id, at);
    let second = make_notification(&profile.user_id, &task.id, at);
    assert!(storage.insert_notification_if_absent(&first).await.unwrap());
    assert!(!storage.insert_notification_if_absent(&second).await.unwrap());

    assert!(storage.record_delivery_failure(&first.id, now()).await.unwrap());
    let listed = storage.list_notifications(&profile.user_id, 10).await.unwrap();
    assert_eq!(listed[0].delivery_attempts, 1);
    assert!(listed[0].last_attempt_at.is_some());

    storage.delete_profile(&profile.id).await.unwrap();
    assert!(storage.list_notifications(&profile.user_id, 10).await.unwrap().is_empty());
}

// ── Prompt Tests ─────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_prompt_name_conflict_is_duplicate() {
    let storage = create_pg_storage().await;
    let name = format!("pg-test-{}", therapy_core::new_id());
    let input = || PromptInput {
        name: name.clone(),
        content: "content".to_owned(),
        method: None,
        is_system: false,
    };
    let first = Prompt::new(input(), now()).unwrap();
    storage.save_prompt(&first).await.unwrap();
    let err = storage.save_prompt(&Prompt::new(input(), now()).unwrap()).await.unwrap_err();
    assert!(err.is_duplicate());
    assert!(storage.delete_prompt(&first.id).await.unwrap());
}
