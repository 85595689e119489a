//! Test utilities and module declarations for storage tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use therapy_core::{
    Notification, NotificationType, Profile, ProfileInput, Session, Task, TaskInput,
};


pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().unwrap_or_default()
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_profile(user_id: &str) -> Profile {
    Profile::new(
        ProfileInput {
            user_id: user_id.to_owned(),
            name: format!("Profile of {user_id}"),
            description: None,
            goals: vec!["sleep better".to_owned()],
            challenges: vec![],
            preferred_method: Some("cbt".to_owned()),
        },
        base_time(),
    )
    .unwrap()
}

pub fn create_test_session(profile: &Profile, scheduled_in: Option<Duration>) -> Session {
    Session::new(
        profile.user_id.clone(),
        profile.id.clone(),
        Some("cbt".to_owned()),
        scheduled_in.map(|d| base_time() + d),
        base_time(),
    )
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_task(profile: &Profile, due_in: Duration) -> Task {
    Task::new(
        profile.user_id.clone(),
        profile.id.clone(),
        TaskInput {
            title: "Breathing exercise".to_owned(),
            description: None,
            due_date: base_time() + due_in,
        },
        base_time(),
    )
    .unwrap()
}

pub fn create_test_notification(
    user_id: &str,
    related_id: &str,
    scheduled_for: DateTime<Utc>,
) -> Notification {
    Notification {
        id: therapy_core::new_id(),
        user_id: user_id.to_owned(),
        notification_type: NotificationType::SessionReminder,
        related_id: related_id.to_owned(),
        scheduled_for,
        title: "Upcoming session".to_owned(),
        message: "Your session starts soon".to_owned(),
        sent: false,
        sent_at: None,
        delivery_attempts: 0,
        last_attempt_at: None,
        created_at: base_time(),
    }
}
