//! One-shot runs of the periodic triggers.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use therapy_core::ReminderConfig;
use therapy_service::{NotificationDispatcher, ReminderService, TracingSender};

use crate::connect_storage;

pub(crate) async fn run_remind() -> Result<()> {
    let storage = connect_storage().await?;
    let service = ReminderService::new(storage, ReminderConfig::from_env());
    let report = service.create_reminders(Utc::now()).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) async fn run_dispatch() -> Result<()> {
    let storage = connect_storage().await?;
    let dispatcher = NotificationDispatcher::new(storage, Arc::new(TracingSender));
    let report = dispatcher.dispatch_due(Utc::now()).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
