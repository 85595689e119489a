//! Periodic triggers. Each runs as its own tokio task, logs failures and
//! carries on with the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use therapy_core::next_hourly_run;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::{NotificationDispatcher, ReminderService};

const HOUR: Duration = Duration::from_secs(3600);

/// Creates reminders once an hour at the configured minute past the hour.
pub fn spawn_reminder_trigger(service: Arc<ReminderService>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let now = Utc::now();
        let first_run = next_hourly_run(now, service.config().cron_minute);
        let delay = (first_run - now).to_std().unwrap_or(Duration::ZERO);
        tracing::info!(first_run = %first_run, "Reminder trigger scheduled");

        let mut interval = tokio::time::interval_at(Instant::now() + delay, HOUR);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match service.create_reminders(Utc::now()).await {
                Ok(report) => {
                    if report.created > 0 || report.failed > 0 {
                        tracing::info!(
                            created = report.created,
                            already_present = report.already_present,
                            failed = report.failed,
                            "Reminder trigger run finished"
                        );
                    }
                },
                Err(e) => tracing::error!(error = %e, "Reminder trigger run failed"),
            }
        }
    })
}

/// Sends due notifications every `period`.
pub fn spawn_dispatch_trigger(
    dispatcher: Arc<NotificationDispatcher>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = dispatcher.dispatch_due(Utc::now()).await {
                tracing::error!(error = %e, "Notification dispatch failed");
            }
        }
    })
}
