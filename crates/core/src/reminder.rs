//! Reminder planning.
//!
//! Pure functions deciding whether a session or task needs a reminder, and
//! when. Storage access and deduplication live in the service layer; the
//! compound notification key makes re-planning the same reminder harmless.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, Timelike, Utc};

use crate::constants::{
    DEFAULT_REMINDER_CRON_MINUTE, DEFAULT_SESSION_REMINDER_MINUTES, DEFAULT_TASK_DUE_TODAY_HOUR,
    DEFAULT_TASK_REMINDER_DAYS, MAX_SESSION_REMINDER_MINUTES, MAX_TASK_REMINDER_DAYS,
    SESSION_REMINDER_HORIZON_HOURS, TASK_REMINDER_HORIZON_DAYS,
};
use crate::env_config::env_parse_with_default;
use crate::notification::{Notification, NotificationType};
use crate::session::Session;
use crate::task::Task;

/// Lead times and clock settings for reminder creation.
///
/// Built once at startup and handed to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderConfig {
    /// Minutes before a scheduled session.
    pub session_lead_minutes: i64,
    /// Days before a task's due date.
    pub task_lead_days: i64,
    /// Local hour of the "due today" reminder.
    pub due_today_hour: u32,
    /// Offset used to decide what "today" and "09:00" mean.
    pub local_offset: FixedOffset,
    /// Minute past each hour at which the reminder trigger fires.
    pub cron_minute: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            session_lead_minutes: DEFAULT_SESSION_REMINDER_MINUTES,
            task_lead_days: DEFAULT_TASK_REMINDER_DAYS,
            due_today_hour: DEFAULT_TASK_DUE_TODAY_HOUR,
            local_offset: Utc.fix(),
            cron_minute: DEFAULT_REMINDER_CRON_MINUTE,
        }
    }
}

impl ReminderConfig {
    /// Reads `SESSION_REMINDER_MINUTES`, `TASK_REMINDER_DAYS`,
    /// `TASK_DUE_TODAY_HOUR`, `REMINDER_UTC_OFFSET_MINUTES` and
    /// `REMINDER_CRON_MINUTE`. Out-of-range values are clamped.
    #[must_use]
    pub fn from_env() -> Self {
        let host_offset_minutes = Local::now().offset().fix().local_minus_utc() / 60;
        let offset_minutes =
            env_parse_with_default("REMINDER_UTC_OFFSET_MINUTES", host_offset_minutes);
        let local_offset = FixedOffset::east_opt(offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| {
                tracing::warn!(offset_minutes, "reminder UTC offset out of range, using UTC");
                Utc.fix()
            });

        Self {
            session_lead_minutes: env_parse_with_default(
                "SESSION_REMINDER_MINUTES",
                DEFAULT_SESSION_REMINDER_MINUTES,
            ),
            task_lead_days: env_parse_with_default("TASK_REMINDER_DAYS", DEFAULT_TASK_REMINDER_DAYS),
            due_today_hour: env_parse_with_default("TASK_DUE_TODAY_HOUR", DEFAULT_TASK_DUE_TODAY_HOUR),
            local_offset,
            cron_minute: env_parse_with_default("REMINDER_CRON_MINUTE", DEFAULT_REMINDER_CRON_MINUTE),
        }
        .normalized()
    }

    /// Clamps lead times to `0..=one year` and clock fields to their ranges.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            session_lead_minutes: self.session_lead_minutes.clamp(0, MAX_SESSION_REMINDER_MINUTES),
            task_lead_days: self.task_lead_days.clamp(0, MAX_TASK_REMINDER_DAYS),
            due_today_hour: self.due_today_hour.min(23),
            cron_minute: self.cron_minute.min(59),
            ..self
        }
    }

    /// `None` when the configured minutes do not fit a [`Duration`].
    #[must_use]
    pub fn session_lead(&self) -> Option<Duration> {
        Duration::try_minutes(self.session_lead_minutes)
    }

    #[must_use]
    pub fn task_lead(&self) -> Option<Duration> {
        Duration::try_days(self.task_lead_days)
    }

    /// Start of the local calendar day containing `now`, in UTC.
    #[must_use]
    pub fn local_day_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.local_at(self.local_date(now), 0).unwrap_or(now)
    }

    #[must_use]
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.local_offset).date_naive()
    }

    /// `date` at `hour:00` local time, in UTC.
    #[must_use]
    pub fn local_at(&self, date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
        date.and_hms_opt(hour, 0, 0)?
            .and_local_timezone(self.local_offset)
            .single()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Time span in which a reminder may be scheduled: strictly after `now`,
/// strictly before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderWindow {
    pub now: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReminderWindow {
    #[must_use]
    pub fn for_sessions(now: DateTime<Utc>) -> Self {
        Self { now, end: now + Duration::hours(SESSION_REMINDER_HORIZON_HOURS) }
    }

    #[must_use]
    pub fn for_tasks(now: DateTime<Utc>) -> Self {
        Self { now, end: now + Duration::days(TASK_REMINDER_HORIZON_DAYS) }
    }

    #[must_use]
    pub fn admits(&self, reminder_time: DateTime<Utc>) -> bool {
        reminder_time > self.now && reminder_time < self.end
    }
}

/// A reminder that should exist; persisted as a [`Notification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReminder {
    pub user_id: String,
    pub notification_type: NotificationType,
    pub related_id: String,
    pub scheduled_for: DateTime<Utc>,
    pub title: String,
    pub message: String,
}

impl PlannedReminder {
    #[must_use]
    pub fn into_notification(self, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: crate::new_id(),
            user_id: self.user_id,
            notification_type: self.notification_type,
            related_id: self.related_id,
            scheduled_for: self.scheduled_for,
            title: self.title,
            message: self.message,
            sent: false,
            sent_at: None,
            delivery_attempts: 0,
            last_attempt_at: None,
            created_at,
        }
    }
}

/// Lead-time reminder for a scheduled, not yet completed session.
#[must_use]
pub fn plan_session_reminder(
    session: &Session,
    now: DateTime<Utc>,
    config: &ReminderConfig,
) -> Option<PlannedReminder> {
    if session.completed {
        return None;
    }
    let starts_at = session.scheduled_for?;
    let reminder_time = starts_at.checked_sub_signed(config.session_lead()?)?;
    if !ReminderWindow::for_sessions(now).admits(reminder_time) {
        return None;
    }
    let local_start = starts_at.with_timezone(&config.local_offset);
    Some(PlannedReminder {
        user_id: session.user_id.clone(),
        notification_type: NotificationType::SessionReminder,
        related_id: session.id.clone(),
        scheduled_for: reminder_time,
        title: "Upcoming therapy session".to_owned(),
        message: format!(
            "Your therapy session starts at {:02}:{:02} on {}.",
            local_start.hour(),
            local_start.minute(),
            local_start.date_naive()
        ),
    })
}

/// Lead-time reminder `task_lead_days` before a task's due date.
#[must_use]
pub fn plan_task_due_soon(
    task: &Task,
    now: DateTime<Utc>,
    config: &ReminderConfig,
) -> Option<PlannedReminder> {
    if task.completed {
        return None;
    }
    let reminder_time = task.due_date.checked_sub_signed(config.task_lead()?)?;
    if !ReminderWindow::for_tasks(now).admits(reminder_time) {
        return None;
    }
    Some(PlannedReminder {
        user_id: task.user_id.clone(),
        notification_type: NotificationType::TaskDueSoon,
        related_id: task.id.clone(),
        scheduled_for: reminder_time,
        title: "Task due soon".to_owned(),
        message: format!("\"{}\" is due on {}.", task.title, config.local_date(task.due_date)),
    })
}

/// Reminder at the configured local hour on the day a task is due.
///
/// Independent of [`plan_task_due_soon`]; both may fire for the same task on
/// the same day. Planned even when the hour has already passed so that the
/// dispatcher still delivers it.
#[must_use]
pub fn plan_task_due_today(
    task: &Task,
    now: DateTime<Utc>,
    config: &ReminderConfig,
) -> Option<PlannedReminder> {
    if task.completed {
        return None;
    }
    let today = config.local_date(now);
    if config.local_date(task.due_date) != today {
        return None;
    }
    let scheduled_for = config.local_at(today, config.due_today_hour)?;
    Some(PlannedReminder {
        user_id: task.user_id.clone(),
        notification_type: NotificationType::TaskDueToday,
        related_id: task.id.clone(),
        scheduled_for,
        title: "Task due today".to_owned(),
        message: format!("\"{}\" is due today.", task.title),
    })
}

/// Next instant strictly after `now` whose minute equals `minute` and whose
/// seconds are zero.
#[must_use]
pub fn next_hourly_run(now: DateTime<Utc>, minute: u32) -> DateTime<Utc> {
    let minute = minute.min(59);
    let hour_start = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let candidate = hour_start + Duration::minutes(i64::from(minute));
    if candidate > now { candidate } else { candidate + Duration::hours(1) }
}
