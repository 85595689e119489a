//! Storage backend trait abstraction
//!
//! One async trait per aggregate, implemented by every backend.

pub mod journal;
pub mod notification;
pub mod profile;
pub mod prompt;
pub mod session;
pub mod task;

pub use journal::JournalStore;
pub use notification::NotificationStore;
pub use profile::ProfileStore;
pub use prompt::PromptStore;
pub use session::SessionStore;
pub use task::TaskStore;
