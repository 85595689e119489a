//! HTTP API server for therapy-tracker.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use therapy_service::{
    JournalService, LlmService, ProfileService, PromptService, SessionService, TaskService,
};
use therapy_storage::StorageBackend;

pub use api_error::ApiError;
pub use response_types::VersionResponse;

/// Shared application state for all HTTP handlers.
///
/// Wrapped in `Arc` for sharing across handlers.
pub struct AppState {
    /// Backend shared by every service; notifications are read from it directly
    pub storage: Arc<StorageBackend>,
    pub profiles: Arc<ProfileService>,
    pub sessions: Arc<SessionService>,
    pub tasks: Arc<TaskService>,
    pub journal: Arc<JournalService>,
    pub prompts: Arc<PromptService>,
    pub llm: Arc<LlmService>,
    /// Mount profile, session, task, journal, notification and LLM routes
    pub staged_routes: bool,
}

impl AppState {
    /// Builds every service over one storage backend.
    pub fn new(storage: Arc<StorageBackend>, llm: Arc<LlmService>, export_dir: PathBuf) -> Self {
        let prompts = Arc::new(PromptService::new(Arc::clone(&storage)));
        Self {
            profiles: Arc::new(ProfileService::new(Arc::clone(&storage))),
            sessions: Arc::new(SessionService::new(
                Arc::clone(&storage),
                Arc::clone(&llm),
                Arc::clone(&prompts),
                export_dir,
            )),
            tasks: Arc::new(TaskService::new(Arc::clone(&storage))),
            journal: Arc::new(JournalService::new(Arc::clone(&storage))),
            prompts,
            llm,
            storage,
            staged_routes: false,
        }
    }

    #[must_use]
    pub fn with_staged_routes(mut self, enabled: bool) -> Self {
        self.staged_routes = enabled;
        self
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/therapy-methods", get(handlers::methods::list_methods))
        .route("/api/therapy-methods/{key}", get(handlers::methods::get_method))
        .route(
            "/api/prompts",
            get(handlers::prompts::list_prompts).post(handlers::prompts::create_prompt),
        )
        .route(
            "/api/prompts/{id}",
            get(handlers::prompts::get_prompt)
                .put(handlers::prompts::update_prompt)
                .delete(handlers::prompts::delete_prompt),
        );

    if state.staged_routes {
        router = router.merge(staged_routes());
    } else {
        tracing::debug!("Staged routes disabled (set ENABLE_STAGED_ROUTES=true to mount them)");
    }

    router.layer(cors).with_state(state)
}

/// Routes for profiles and everything hanging off them.
fn staged_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/profiles",
            get(handlers::profiles::list_profiles).post(handlers::profiles::create_profile),
        )
        .route(
            "/api/profiles/{id}",
            get(handlers::profiles::get_profile)
                .put(handlers::profiles::update_profile)
                .delete(handlers::profiles::delete_profile),
        )
        .route(
            "/api/profiles/{id}/emotional-states",
            post(handlers::profiles::add_emotional_state),
        )
        .route(
            "/api/profiles/{id}/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::start_session),
        )
        .route(
            "/api/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        .route("/api/sessions/{id}/messages", post(handlers::sessions::send_message))
        .route("/api/sessions/{id}/end", post(handlers::sessions::end_session))
        .route("/api/sessions/{id}/export", post(handlers::sessions::export_session))
        .route(
            "/api/profiles/{id}/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route("/api/tasks/{id}/complete", post(handlers::tasks::complete_task))
        .route(
            "/api/profiles/{id}/journal",
            get(handlers::journal::list_entries).post(handlers::journal::create_entry),
        )
        .route(
            "/api/journal/{id}",
            get(handlers::journal::get_entry)
                .put(handlers::journal::update_entry)
                .delete(handlers::journal::delete_entry),
        )
        .route("/api/notifications", get(handlers::notifications::list_notifications))
        .route("/api/llm/generate", post(handlers::llm::generate))
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
