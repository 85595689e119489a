use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Kind of reminder a notification represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Fires a configured number of minutes before a scheduled session.
    SessionReminder,
    /// Fires a configured number of days before a task's due date.
    TaskDueSoon,
    /// Fires at a fixed local hour on the day a task is due.
    TaskDueToday,
}

impl NotificationType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::SessionReminder => "session_reminder",
            Self::TaskDueSoon => "task_due_soon",
            Self::TaskDueToday => "task_due_today",
        }
    }
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session_reminder" => Ok(Self::SessionReminder),
            "task_due_soon" => Ok(Self::TaskDueSoon),
            "task_due_today" => Ok(Self::TaskDueToday),
            _ => Err(CoreError::Parse { kind: "notification type", value: s.to_owned() }),
        }
    }
}

/// Identity of a reminder. At most one notification exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationKey {
    pub user_id: String,
    pub notification_type: NotificationType,
    pub related_id: String,
    pub scheduled_for: DateTime<Utc>,
}

/// A scheduled reminder record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub notification_type: NotificationType,
    pub related_id: String,
    pub scheduled_for: DateTime<Utc>,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    /// Failed delivery attempts so far.
    #[serde(default)]
    pub delivery_attempts: u32,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    #[must_use]
    pub fn key(&self) -> NotificationKey {
        NotificationKey {
            user_id: self.user_id.clone(),
            notification_type: self.notification_type,
            related_id: self.related_id.clone(),
            scheduled_for: self.scheduled_for,
        }
    }

    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.sent && self.scheduled_for <= now
    }

    pub fn record_failed_attempt(&mut self, at: DateTime<Utc>) {
        self.delivery_attempts = self.delivery_attempts.saturating_add(1);
        self.last_attempt_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_round_trips_and_serializes_snake_case() {
        for t in [
            NotificationType::SessionReminder,
            NotificationType::TaskDueSoon,
            NotificationType::TaskDueToday,
        ] {
            assert_eq!(t.as_str().parse::<NotificationType>().unwrap(), t);
            assert_eq!(serde_json::to_value(t).unwrap(), serde_json::json!(t.as_str()));
        }
        assert!("reminder".parse::<NotificationType>().is_err());
    }
}
