//! Shared fixtures for service tests. Everything runs on the in-memory
//! backend; LLM calls go to a wiremock server.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use therapy_core::ReminderConfig;
use therapy_llm::{LlmProvider, LlmSettings, ProviderKind};
use therapy_storage::StorageBackend;

use crate::{
    JournalService, LlmService, ProfileService, PromptService, ReminderService, SessionService,
    TaskService,
};

mod dispatcher_tests;
mod reminder_tests;
mod task_tests;

pub struct TestServices {
    pub storage: Arc<StorageBackend>,
    pub profiles: ProfileService,
    pub prompts: Arc<PromptService>,
    pub sessions: SessionService,
    pub tasks: TaskService,
    pub journal: JournalService,
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap_or_default()
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn openai_provider(base_url: &str) -> Arc<LlmProvider> {
    Arc::new(
        LlmProvider::new(
            LlmSettings::new(ProviderKind::OpenAi, "test-key")
                .with_base_url(base_url)
                .with_model("gpt-test"),
        )
        .unwrap(),
    )
}

pub fn build_services(llm: Option<Arc<LlmProvider>>, export_dir: &Path) -> TestServices {
    let storage = Arc::new(StorageBackend::new_memory());
    let prompts = Arc::new(PromptService::new(Arc::clone(&storage)));
    let llm = Arc::new(LlmService::new(llm));
    TestServices {
        profiles: ProfileService::new(Arc::clone(&storage)),
        sessions: SessionService::new(
            Arc::clone(&storage),
            llm,
            Arc::clone(&prompts),
            export_dir.to_path_buf(),
        ),
        tasks: TaskService::new(Arc::clone(&storage)),
        journal: JournalService::new(Arc::clone(&storage)),
        prompts,
        storage,
    }
}

pub fn reminder_service(storage: &Arc<StorageBackend>) -> ReminderService {
    ReminderService::new(Arc::clone(storage), ReminderConfig::default())
}
