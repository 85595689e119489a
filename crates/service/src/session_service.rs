use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use therapy_core::{
    DEFAULT_THERAPY_METHOD, MAX_MESSAGE_LEN, MessageRole, Session, SessionMessage,
    find_therapy_method,
};
use therapy_storage::StorageBackend;
use therapy_storage::traits::{NotificationStore, ProfileStore, SessionStore};

use crate::profile_service::canonical_method;
use crate::session_export::{read_session_export, write_session_export};
use crate::{LlmService, PromptService, ServiceError};

/// Parameters for opening a session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartSession {
    pub scheduled_for: Option<DateTime<Utc>>,
    pub therapy_method: Option<String>,
}

pub struct SessionService {
    storage: Arc<StorageBackend>,
    llm: Arc<LlmService>,
    prompts: Arc<PromptService>,
    export_dir: PathBuf,
}

impl SessionService {
    #[must_use]
    pub fn new(
        storage: Arc<StorageBackend>,
        llm: Arc<LlmService>,
        prompts: Arc<PromptService>,
        export_dir: PathBuf,
    ) -> Self {
        Self { storage, llm, prompts, export_dir }
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Opens a session seeded with the method's system prompt.
    ///
    /// The method falls back to the profile's preferred one, then to the
    /// default method.
    pub async fn start_session(
        &self,
        profile_id: &str,
        params: StartSession,
    ) -> Result<Session, ServiceError> {
        let profile = self
            .storage
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile", profile_id))?;

        let key = canonical_method(params.therapy_method)?
            .or(profile.preferred_method)
            .unwrap_or_else(|| DEFAULT_THERAPY_METHOD.to_owned());
        let method = find_therapy_method(&key)
            .ok_or_else(|| ServiceError::InvalidInput(format!("unknown therapy method: {key}")))?;
        let system_prompt = self.prompts.system_prompt_for(method).await?;

        let now = Utc::now();
        let mut session = Session::new(
            profile.user_id,
            profile.id,
            Some(method.key.to_owned()),
            params.scheduled_for,
            now,
        );
        session.push_message(MessageRole::System, &system_prompt, now)?;
        self.storage.save_session(&session).await?;
        self.storage.record_session_started(&session.profile_id, session.started_at).await?;

        tracing::info!(
            session_id = %session.id,
            profile_id = %session.profile_id,
            method = method.key,
            scheduled = session.scheduled_for.is_some(),
            "Session started"
        );
        Ok(session)
    }

    pub async fn get_session(&self, id: &str) -> Result<Session, ServiceError> {
        self.storage.get_session(id).await?.ok_or_else(|| ServiceError::not_found("session", id))
    }

    pub async fn list_sessions(&self, profile_id: &str, limit: usize) -> Result<Vec<Session>, ServiceError> {
        Ok(self.storage.list_sessions(profile_id, limit).await?)
    }

    /// Appends the user's message, asks the provider for a reply over the
    /// whole transcript and appends the reply.
    ///
    /// If the provider call fails the user message stays in the session.
    pub async fn send_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<SessionMessage, ServiceError> {
        if content.trim().is_empty() {
            return Err(ServiceError::InvalidInput("message content must not be empty".to_owned()));
        }
        if content.len() > MAX_MESSAGE_LEN {
            return Err(ServiceError::InvalidInput(format!(
                "message exceeds {MAX_MESSAGE_LEN} bytes"
            )));
        }
        self.llm.ensure_configured()?;

        let session = self.get_session(session_id).await?;
        session.ensure_open()?;

        let user_message = SessionMessage {
            role: MessageRole::User,
            content: content.to_owned(),
            timestamp: Utc::now(),
        };
        self.append(session_id, &user_message).await?;

        let mut transcript = session.chat_transcript();
        transcript.push(user_message.to_chat());
        let reply = self
            .llm
            .reply(&transcript)
            .await
            .inspect_err(|e| tracing::warn!(session_id, error = %e, "LLM reply failed"))?;

        let assistant_message =
            SessionMessage { role: MessageRole::Assistant, content: reply, timestamp: Utc::now() };
        self.append(session_id, &assistant_message).await?;
        Ok(assistant_message)
    }

    async fn append(&self, session_id: &str, message: &SessionMessage) -> Result<(), ServiceError> {
        if self.storage.append_session_message(session_id, message).await? {
            return Ok(());
        }
        // Lost a race with end_session or delete_session.
        Err(self.closed_session_error(session_id).await)
    }

    async fn closed_session_error(&self, session_id: &str) -> ServiceError {
        match self.storage.get_session(session_id).await {
            Ok(Some(_)) => ServiceError::InvalidInput(format!("session {session_id} is already completed")),
            Ok(None) => ServiceError::not_found("session", session_id),
            Err(e) => e.into(),
        }
    }

    /// Marks the session completed with its metrics, then exports it.
    /// An export failure is logged and does not fail the call.
    pub async fn end_session(&self, session_id: &str) -> Result<Session, ServiceError> {
        let now = Utc::now();
        let Some(session) = self.storage.complete_session(session_id, now).await? else {
            return Err(self.closed_session_error(session_id).await);
        };
        self.storage.delete_pending_notifications(&session.id).await?;

        if let Some(metrics) = &session.metrics {
            tracing::info!(
                session_id,
                messages = metrics.message_count,
                duration_secs = metrics.duration_secs,
                "Session ended"
            );
        }

        match write_session_export(&session, &self.export_dir, now).await {
            Ok(path) => tracing::info!(session_id, path = %path.display(), "Session exported"),
            Err(e) => tracing::warn!(session_id, error = %e, "Session export failed"),
        }
        Ok(session)
    }

    pub async fn export_session(&self, session_id: &str) -> Result<PathBuf, ServiceError> {
        let session = self.get_session(session_id).await?;
        write_session_export(&session, &self.export_dir, Utc::now()).await
    }

    /// Inserts a previously exported session under a new id.
    pub async fn import_session(&self, path: &Path) -> Result<Session, ServiceError> {
        let session = read_session_export(path, Utc::now()).await?;
        if self.storage.get_profile(&session.profile_id).await?.is_none() {
            return Err(ServiceError::not_found("profile", &session.profile_id));
        }
        self.storage.save_session(&session).await?;
        self.storage.record_session_started(&session.profile_id, session.started_at).await?;
        tracing::info!(session_id = %session.id, path = %path.display(), "Session imported");
        Ok(session)
    }

    pub async fn delete_session(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(session) = self.storage.get_session(id).await? else {
            return Ok(false);
        };
        if !self.storage.delete_session(id).await? {
            return Ok(false);
        }
        self.storage.delete_pending_notifications(id).await?;
        self.storage.record_session_removed(&session.profile_id).await?;
        Ok(true)
    }
}
