//! Storage layer for therapy-tracker
//!
//! PostgreSQL storage via sqlx, plus an in-process backend used for local runs
//! without a database and for tests. Both sit behind per-aggregate traits and
//! the [`StorageBackend`] enum.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod backend;
mod error;
mod memory;
mod pg_migrations;
mod pg_storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use pg_storage::PgStorage;
