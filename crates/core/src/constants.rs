//! Shared constants for therapy-tracker.

/// Maximum number of results for any list query (DoS protection).
pub const MAX_QUERY_LIMIT: usize = 500;

/// Default number of results when limit is not specified by the caller.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// How far ahead session reminders are planned.
pub const SESSION_REMINDER_HORIZON_HOURS: i64 = 24;

/// How far ahead task reminders are planned.
pub const TASK_REMINDER_HORIZON_DAYS: i64 = 2;

/// Default lead time before a scheduled session.
pub const DEFAULT_SESSION_REMINDER_MINUTES: i64 = 60;

/// Default lead time before a task due date.
pub const DEFAULT_TASK_REMINDER_DAYS: i64 = 1;

/// Upper bound for the session lead time (one year).
pub const MAX_SESSION_REMINDER_MINUTES: i64 = 525_600;

/// Upper bound for the task lead time.
pub const MAX_TASK_REMINDER_DAYS: i64 = 365;

/// Local hour at which "due today" task reminders fire.
pub const DEFAULT_TASK_DUE_TODAY_HOUR: u32 = 9;

/// Minute past the hour at which the reminder trigger runs.
pub const DEFAULT_REMINDER_CRON_MINUTE: u32 = 5;

/// Maximum due notifications delivered per dispatch tick.
pub const DISPATCH_BATCH_LIMIT: usize = 200;

/// Default directory for session JSON exports.
pub const DEFAULT_SESSION_EXPORT_DIR: &str = "exports/sessions";

/// Maximum length of a single chat message accepted from a client.
pub const MAX_MESSAGE_LEN: usize = 16_000;

/// Default HTTP listen port.
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default HTTP listen address.
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Seconds between notification dispatch ticks.
pub const DISPATCH_INTERVAL_SECS: u64 = 60;
