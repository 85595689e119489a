use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use crate::{
    NotificationType, ReminderConfig, ReminderWindow, Session, Task, TaskInput, next_hourly_run,
    plan_session_reminder, plan_task_due_soon, plan_task_due_today,
};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn scheduled_session(starts_at: DateTime<Utc>, now: DateTime<Utc>) -> Session {
    Session::new("user-1".to_owned(), "profile-1".to_owned(), None, Some(starts_at), now)
}

fn task_due(due: DateTime<Utc>, now: DateTime<Utc>) -> Task {
    Task::new(
        "user-1".to_owned(),
        "profile-1".to_owned(),
        TaskInput { title: "Breathing exercise".to_owned(), description: None, due_date: due },
        now,
    )
    .unwrap()
}

#[test]
fn session_at_14_with_60_minute_lead_reminds_at_13() {
    let now = at(2024, 6, 10, 12, 30);
    let config = ReminderConfig { session_lead_minutes: 60, ..ReminderConfig::default() };
    let session = scheduled_session(at(2024, 6, 10, 14, 0), now);

    let planned = plan_session_reminder(&session, now, &config).unwrap();
    assert_eq!(planned.scheduled_for, at(2024, 6, 10, 13, 0));
    assert_eq!(planned.notification_type, NotificationType::SessionReminder);
    assert_eq!(planned.related_id, session.id);
    assert_eq!(planned.user_id, "user-1");
}

#[test]
fn session_reminder_in_the_past_is_skipped() {
    let now = at(2024, 6, 10, 13, 30);
    let config = ReminderConfig::default();
    let session = scheduled_session(at(2024, 6, 10, 14, 0), now);
    assert!(plan_session_reminder(&session, now, &config).is_none());
}

#[test]
fn session_reminder_exactly_now_is_skipped() {
    let now = at(2024, 6, 10, 13, 0);
    let config = ReminderConfig::default();
    let session = scheduled_session(at(2024, 6, 10, 14, 0), now);
    assert!(plan_session_reminder(&session, now, &config).is_none());
}

#[test]
fn session_reminder_at_window_end_is_skipped() {
    let now = at(2024, 6, 10, 12, 0);
    let config = ReminderConfig { session_lead_minutes: 0, ..ReminderConfig::default() };
    let session = scheduled_session(now + Duration::hours(24), now);
    assert!(plan_session_reminder(&session, now, &config).is_none());

    let inside = scheduled_session(now + Duration::hours(24) - Duration::minutes(1), now);
    assert!(plan_session_reminder(&inside, now, &config).is_some());
}

#[test]
fn unscheduled_or_completed_sessions_get_no_reminder() {
    let now = at(2024, 6, 10, 8, 0);
    let config = ReminderConfig::default();
    let adhoc = Session::new("u".to_owned(), "p".to_owned(), None, None, now);
    assert!(plan_session_reminder(&adhoc, now, &config).is_none());

    let mut done = scheduled_session(at(2024, 6, 10, 14, 0), now);
    done.complete(now).unwrap();
    assert!(plan_session_reminder(&done, now, &config).is_none());
}

#[test]
fn task_due_tomorrow_midnight_gets_no_lead_reminder_after_midnight() {
    let now = at(2024, 6, 10, 10, 0);
    let config = ReminderConfig { task_lead_days: 1, ..ReminderConfig::default() };
    let task = task_due(at(2024, 6, 11, 0, 0), now);

    assert!(plan_task_due_soon(&task, now, &config).is_none());
    assert!(plan_task_due_today(&task, now, &config).is_none(), "due tomorrow, not today");
}

#[test]
fn task_due_in_36_hours_reminds_one_day_ahead() {
    let now = at(2024, 6, 10, 10, 0);
    let config = ReminderConfig::default();
    let task = task_due(at(2024, 6, 11, 22, 0), now);

    let planned = plan_task_due_soon(&task, now, &config).unwrap();
    assert_eq!(planned.scheduled_for, at(2024, 6, 10, 22, 0));
    assert_eq!(planned.notification_type, NotificationType::TaskDueSoon);
}

#[test]
fn task_due_today_fires_at_nine_even_after_nine() {
    let now = at(2024, 6, 10, 10, 0);
    let config = ReminderConfig::default();
    let task = task_due(at(2024, 6, 10, 18, 0), now);

    let planned = plan_task_due_today(&task, now, &config).unwrap();
    assert_eq!(planned.scheduled_for, at(2024, 6, 10, 9, 0));
    assert_eq!(planned.notification_type, NotificationType::TaskDueToday);
}

#[test]
fn task_can_receive_both_due_soon_and_due_today() {
    let now = at(2024, 6, 10, 6, 0);
    let config = ReminderConfig { task_lead_days: 0, ..ReminderConfig::default() };
    let task = task_due(at(2024, 6, 10, 20, 0), now);

    let soon = plan_task_due_soon(&task, now, &config).unwrap();
    let today = plan_task_due_today(&task, now, &config).unwrap();
    assert_eq!(soon.scheduled_for, at(2024, 6, 10, 20, 0));
    assert_eq!(today.scheduled_for, at(2024, 6, 10, 9, 0));
    assert_ne!(soon.notification_type, today.notification_type);
}

#[test]
fn due_today_uses_local_offset() {
    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    let config = ReminderConfig { local_offset: plus_two, ..ReminderConfig::default() };
    // 23:30 UTC on the 9th is 01:30 local on the 10th.
    let now = at(2024, 6, 9, 23, 30);
    let task = task_due(at(2024, 6, 10, 15, 0), now);

    let planned = plan_task_due_today(&task, now, &config).unwrap();
    assert_eq!(planned.scheduled_for, at(2024, 6, 10, 7, 0));
    assert_eq!(config.local_day_start(now), at(2024, 6, 9, 22, 0));
}

#[test]
fn completed_task_gets_no_reminders() {
    let now = at(2024, 6, 10, 6, 0);
    let config = ReminderConfig::default();
    let mut task = task_due(at(2024, 6, 11, 12, 0), now);
    task.set_completed(true, now);
    assert!(plan_task_due_soon(&task, now, &config).is_none());
    assert!(plan_task_due_today(&task, now, &config).is_none());
}

#[test]
fn out_of_range_lead_times_plan_nothing() {
    let now = at(2024, 6, 10, 12, 30);
    let config = ReminderConfig {
        session_lead_minutes: i64::MAX / 2,
        task_lead_days: i64::MAX / 2,
        ..ReminderConfig::default()
    };
    assert!(config.session_lead().is_none());
    assert!(config.task_lead().is_none());

    let session = scheduled_session(at(2024, 6, 10, 14, 0), now);
    assert!(plan_session_reminder(&session, now, &config).is_none());
    let task = task_due(at(2024, 6, 11, 12, 0), now);
    assert!(plan_task_due_soon(&task, now, &config).is_none());

    // a representable lead that underflows the calendar
    let config = ReminderConfig { task_lead_days: 1_000_000_000, ..ReminderConfig::default() };
    assert!(config.task_lead().is_some());
    assert!(plan_task_due_soon(&task, now, &config).is_none());
}

#[test]
fn normalized_clamps_lead_times_to_a_year() {
    let config = ReminderConfig {
        session_lead_minutes: i64::MAX,
        task_lead_days: -3,
        due_today_hour: 42,
        cron_minute: 75,
        ..ReminderConfig::default()
    }
    .normalized();
    assert_eq!(config.session_lead_minutes, 525_600);
    assert_eq!(config.task_lead_days, 0);
    assert_eq!(config.due_today_hour, 23);
    assert_eq!(config.cron_minute, 59);
    assert_eq!(config.session_lead(), Some(Duration::days(365)));

    let config = ReminderConfig { task_lead_days: 10_000, ..ReminderConfig::default() }.normalized();
    assert_eq!(config.task_lead_days, 365);
    assert_eq!(ReminderConfig::default().normalized(), ReminderConfig::default());
}

#[test]
fn windows_have_fixed_horizons() {
    let now = at(2024, 6, 10, 0, 0);
    assert_eq!(ReminderWindow::for_sessions(now).end, at(2024, 6, 11, 0, 0));
    assert_eq!(ReminderWindow::for_tasks(now).end, at(2024, 6, 12, 0, 0));
}

#[test]
fn planned_reminder_becomes_unsent_notification() {
    let now = at(2024, 6, 10, 12, 30);
    let session = scheduled_session(at(2024, 6, 10, 14, 0), now);
    let planned = plan_session_reminder(&session, now, &ReminderConfig::default()).unwrap();
    let notification = planned.clone().into_notification(now);
    assert!(!notification.sent);
    assert_eq!(notification.scheduled_for, planned.scheduled_for);
    assert!(notification.is_due(at(2024, 6, 10, 13, 0)));
    assert!(!notification.is_due(at(2024, 6, 10, 12, 59)));
}

#[test]
fn next_hourly_run_respects_minute_offset() {
    assert_eq!(next_hourly_run(at(2024, 6, 10, 12, 3), 5), at(2024, 6, 10, 12, 5));
    assert_eq!(next_hourly_run(at(2024, 6, 10, 12, 5), 5), at(2024, 6, 10, 13, 5));
    assert_eq!(next_hourly_run(at(2024, 6, 10, 23, 50), 5), at(2024, 6, 11, 0, 5));
}
