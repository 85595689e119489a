//! Service layer for therapy-tracker
//!
//! Centralizes business logic between the HTTP handlers / CLI and
//! storage / llm, plus the periodic reminder and dispatch triggers.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod dispatcher;
mod error;
mod journal_service;
mod llm_service;
mod profile_service;
mod prompt_service;
mod reminder_service;
mod scheduler;
mod session_export;
mod session_service;
mod task_service;

#[cfg(test)]
mod tests;

pub use dispatcher::{DispatchReport, NotificationDispatcher, NotificationSender, TracingSender};
pub use error::ServiceError;
pub use journal_service::JournalService;
pub use llm_service::{GenerateRequest, GenerateResponse, LlmService};
pub use profile_service::ProfileService;
pub use prompt_service::PromptService;
pub use reminder_service::{ReminderRunReport, ReminderService};
pub use scheduler::{spawn_dispatch_trigger, spawn_reminder_trigger};
pub use session_export::{export_file_name, read_session_export, write_session_export};
pub use session_service::{SessionService, StartSession};
pub use task_service::TaskService;

/// Clamp a caller-supplied list limit to `[1, MAX_QUERY_LIMIT]`.
#[must_use]
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(therapy_core::DEFAULT_QUERY_LIMIT).clamp(1, therapy_core::MAX_QUERY_LIMIT)
}
