//! Reminder creation: turns upcoming sessions and tasks into notifications.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use therapy_core::{
    PlannedReminder, ReminderConfig, ReminderWindow, plan_session_reminder, plan_task_due_soon,
    plan_task_due_today,
};
use therapy_storage::StorageBackend;
use therapy_storage::traits::{NotificationStore, SessionStore, TaskStore};

use crate::ServiceError;

/// Outcome counts of one reminder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderRunReport {
    /// Notifications inserted by this run.
    pub created: usize,
    /// Planned reminders whose key already existed.
    pub already_present: usize,
    /// Candidates that needed no reminder (outside the window, not today).
    pub skipped: usize,
    /// Candidates whose insert failed.
    pub failed: usize,
}

impl ReminderRunReport {
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            created: self.created + other.created,
            already_present: self.already_present + other.already_present,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

pub struct ReminderService {
    storage: Arc<StorageBackend>,
    config: ReminderConfig,
}

impl ReminderService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, config: ReminderConfig) -> Self {
        Self { storage, config }
    }

    #[must_use]
    pub const fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Session reminders for sessions scheduled within the next 24 hours.
    pub async fn create_session_reminders(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ReminderRunReport, ServiceError> {
        let window = ReminderWindow::for_sessions(now);
        let sessions = self.storage.list_scheduled_sessions(window.now, window.end).await?;
        let mut report = ReminderRunReport::default();
        for session in &sessions {
            let planned = plan_session_reminder(session, now, &self.config);
            self.record(planned, now, &mut report).await;
        }
        tracing::debug!(candidates = sessions.len(), ?report, "Session reminder pass finished");
        Ok(report)
    }

    /// Due-soon and due-today reminders for open tasks due between the start
    /// of the local day and two days from now.
    pub async fn create_task_reminders(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ReminderRunReport, ServiceError> {
        let window = ReminderWindow::for_tasks(now);
        let from = self.config.local_day_start(now);
        let tasks = self.storage.list_tasks_due(from, window.end).await?;
        let mut report = ReminderRunReport::default();
        for task in &tasks {
            self.record(plan_task_due_soon(task, now, &self.config), now, &mut report).await;
            self.record(plan_task_due_today(task, now, &self.config), now, &mut report).await;
        }
        tracing::debug!(candidates = tasks.len(), ?report, "Task reminder pass finished");
        Ok(report)
    }

    /// Runs both passes. A failed fetch in one pass does not stop the other;
    /// the first such error is returned after both have run.
    pub async fn create_reminders(&self, now: DateTime<Utc>) -> Result<ReminderRunReport, ServiceError> {
        let sessions = self.create_session_reminders(now).await;
        let tasks = self.create_task_reminders(now).await;
        match (sessions, tasks) {
            (Ok(a), Ok(b)) => Ok(a.merge(b)),
            (Err(e), Ok(b)) => {
                tracing::warn!(report = ?b, "Task reminders created despite session pass failure");
                Err(e)
            },
            (Ok(a), Err(e)) => {
                tracing::warn!(report = ?a, "Session reminders created despite task pass failure");
                Err(e)
            },
            (Err(e), Err(other)) => {
                tracing::warn!(error = %other, "Task reminder pass failed");
                Err(e)
            },
        }
    }

    async fn record(
        &self,
        planned: Option<PlannedReminder>,
        now: DateTime<Utc>,
        report: &mut ReminderRunReport,
    ) {
        let Some(planned) = planned else {
            report.skipped += 1;
            return;
        };
        let notification = planned.into_notification(now);
        match self.storage.insert_notification_if_absent(&notification).await {
            Ok(true) => {
                report.created += 1;
                tracing::debug!(
                    notification_type = %notification.notification_type,
                    related_id = %notification.related_id,
                    scheduled_for = %notification.scheduled_for,
                    "Reminder created"
                );
            },
            Ok(false) => report.already_present += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    notification_type = %notification.notification_type,
                    related_id = %notification.related_id,
                    error = %e,
                    "Failed to create reminder"
                );
            },
        }
    }
}
