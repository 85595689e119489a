//! Core types for therapy-tracker
//!
//! This crate contains domain types shared across all other crates, plus the
//! pure reminder planning logic used by the scheduler.

mod constants;
mod env_config;
mod error;
mod journal;
mod notification;
mod profile;
mod prompt;
mod reminder;
#[cfg(test)]
mod reminder_tests;
mod session;
mod task;
mod therapy_method;

pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use journal::*;
pub use notification::*;
pub use profile::*;
pub use prompt::*;
pub use reminder::*;
pub use session::*;
pub use task::*;
pub use therapy_method::*;

/// Generates a fresh random identifier for a stored document.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
