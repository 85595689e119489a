use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use therapy_core::{
    DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT, DISPATCH_INTERVAL_SECS, ReminderConfig, env_flag,
    env_non_empty, env_parse_with_default,
};
use therapy_http::{AppState, create_router};
use therapy_service::{
    NotificationDispatcher, ReminderService, TracingSender, spawn_dispatch_trigger,
    spawn_reminder_trigger,
};

use crate::{connect_storage, export_dir, llm_from_env};

pub(crate) async fn run(port: Option<u16>, host: Option<String>, staged_routes: bool) -> Result<()> {
    let port = port.unwrap_or_else(|| env_parse_with_default("PORT", DEFAULT_HTTP_PORT));
    let host = host
        .or_else(|| env_non_empty("HOST"))
        .unwrap_or_else(|| DEFAULT_HTTP_HOST.to_owned());
    let staged_routes = staged_routes || env_flag("ENABLE_STAGED_ROUTES", false);

    let storage = connect_storage().await?;
    let llm = llm_from_env();

    let reminder_config = ReminderConfig::from_env();
    tracing::info!(
        session_lead_minutes = reminder_config.session_lead_minutes,
        task_lead_days = reminder_config.task_lead_days,
        due_today_hour = reminder_config.due_today_hour,
        utc_offset = %reminder_config.local_offset,
        "Reminder configuration"
    );
    let reminders = Arc::new(ReminderService::new(Arc::clone(&storage), reminder_config));
    let dispatcher =
        Arc::new(NotificationDispatcher::new(Arc::clone(&storage), Arc::new(TracingSender)));
    let _reminder_trigger = spawn_reminder_trigger(reminders);
    let _dispatch_trigger =
        spawn_dispatch_trigger(dispatcher, Duration::from_secs(DISPATCH_INTERVAL_SECS));

    let state = AppState::new(storage, llm, export_dir(None)).with_staged_routes(staged_routes);
    let router = create_router(Arc::new(state));

    let addr = format!("{host}:{port}");
    tracing::info!(%addr, staged_routes, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
