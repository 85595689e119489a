use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl Display for MessageRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(CoreError::Parse { kind: "message role", value: s.to_owned() }),
        }
    }
}

/// Provider-agnostic chat message handed to the LLM adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A message persisted in a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl SessionMessage {
    #[must_use]
    pub fn to_chat(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

/// One therapy conversation instance tied to a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub profile_id: String,
    pub therapy_method: Option<String>,
    #[serde(default)]
    pub messages: Vec<SessionMessage>,
    /// Planned start, used for reminders. `None` for ad-hoc sessions.
    pub scheduled_for: Option<DateTime<Utc>>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    pub metrics: Option<SessionMetrics>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(
        user_id: String,
        profile_id: String,
        therapy_method: Option<String>,
        scheduled_for: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: crate::new_id(),
            user_id,
            profile_id,
            therapy_method,
            messages: Vec::new(),
            scheduled_for,
            started_at: scheduled_for.unwrap_or(now),
            ended_at: None,
            completed: false,
            metrics: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message. Completed sessions are immutable.
    pub fn push_message(
        &mut self,
        role: MessageRole,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<&SessionMessage, CoreError> {
        self.ensure_open()?;
        if content.trim().is_empty() {
            return Err(CoreError::InvalidInput("message content must not be empty".to_owned()));
        }
        self.messages.push(SessionMessage { role, content: content.to_owned(), timestamp: now });
        self.updated_at = now;
        self.messages
            .last()
            .ok_or_else(|| CoreError::InvalidInput("message was not appended".to_owned()))
    }

    /// Marks the session completed and records its metrics.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<&SessionMetrics, CoreError> {
        self.ensure_open()?;
        let metrics = SessionMetrics::compute(&self.messages, self.started_at, now);
        self.ended_at = Some(now);
        self.completed = true;
        self.updated_at = now;
        Ok(self.metrics.insert(metrics))
    }

    pub fn ensure_open(&self) -> Result<(), CoreError> {
        if self.completed {
            return Err(CoreError::InvalidInput(format!("session {} is already completed", self.id)));
        }
        Ok(())
    }

    /// Transcript in the shape the LLM adapters expect.
    #[must_use]
    pub fn chat_transcript(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(SessionMessage::to_chat).collect()
    }
}

/// End-of-session statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub message_count: u32,
    pub user_message_count: u32,
    pub assistant_message_count: u32,
    pub user_characters: u64,
    pub average_user_message_len: f64,
    pub duration_secs: i64,
}

impl SessionMetrics {
    #[must_use]
    pub fn compute(
        messages: &[SessionMessage],
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        let conversational = messages.iter().filter(|m| m.role != MessageRole::System);
        let mut message_count = 0_u32;
        let mut user_message_count = 0_u32;
        let mut assistant_message_count = 0_u32;
        let mut user_characters = 0_u64;
        for message in conversational {
            message_count = message_count.saturating_add(1);
            match message.role {
                MessageRole::User => {
                    user_message_count = user_message_count.saturating_add(1);
                    let chars = u64::try_from(message.content.chars().count()).unwrap_or(u64::MAX);
                    user_characters = user_characters.saturating_add(chars);
                },
                MessageRole::Assistant => {
                    assistant_message_count = assistant_message_count.saturating_add(1);
                },
                MessageRole::System => {},
            }
        }
        #[allow(clippy::cast_precision_loss, reason = "character counts fit comfortably in f64")]
        let average_user_message_len = if user_message_count == 0 {
            0.0
        } else {
            user_characters as f64 / f64::from(user_message_count)
        };
        Self {
            message_count,
            user_message_count,
            assistant_message_count,
            user_characters,
            average_user_message_len,
            duration_secs: (ended_at - started_at).num_seconds().max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn session() -> Session {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        Session::new("user-1".to_owned(), "profile-1".to_owned(), Some("cbt".to_owned()), None, now)
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            assert_eq!(role.as_str().parse::<MessageRole>().unwrap(), role);
        }
        assert!("tool".parse::<MessageRole>().is_err());
    }

    #[test]
    fn push_message_rejects_blank_content() {
        let mut s = session();
        let now = s.started_at;
        assert!(s.push_message(MessageRole::User, "   ", now).is_err());
        assert!(s.messages.is_empty());
    }

    #[test]
    fn completed_session_is_immutable() {
        let mut s = session();
        let now = s.started_at;
        s.push_message(MessageRole::User, "hello", now).unwrap();
        s.complete(now + Duration::minutes(30)).unwrap();
        assert!(s.push_message(MessageRole::User, "again", now).is_err());
        assert!(s.complete(now).is_err());
        assert_eq!(s.messages.len(), 1);
    }

    #[test]
    fn metrics_ignore_system_messages() {
        let mut s = session();
        let start = s.started_at;
        s.push_message(MessageRole::System, "You are a therapist.", start).unwrap();
        s.push_message(MessageRole::User, "abcd", start).unwrap();
        s.push_message(MessageRole::Assistant, "tell me more", start).unwrap();
        s.push_message(MessageRole::User, "ab", start).unwrap();

        let metrics = *s.complete(start + Duration::minutes(45)).unwrap();
        assert_eq!(metrics.message_count, 3);
        assert_eq!(metrics.user_message_count, 2);
        assert_eq!(metrics.assistant_message_count, 1);
        assert_eq!(metrics.user_characters, 6);
        assert!((metrics.average_user_message_len - 3.0).abs() < f64::EPSILON);
        assert_eq!(metrics.duration_secs, 45 * 60);
        assert!(s.completed);
        assert_eq!(s.ended_at, Some(start + Duration::minutes(45)));
    }

    #[test]
    fn metrics_for_empty_transcript() {
        let start = Utc::now();
        let metrics = SessionMetrics::compute(&[], start, start - Duration::seconds(5));
        assert_eq!(metrics.message_count, 0);
        assert_eq!(metrics.duration_secs, 0);
        assert!(metrics.average_user_message_len.abs() < f64::EPSILON);
    }

    #[test]
    fn scheduled_session_starts_at_schedule() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let at = now + Duration::hours(4);
        let s = Session::new("u".to_owned(), "p".to_owned(), None, Some(at), now);
        assert_eq!(s.started_at, at);
        assert_eq!(s.created_at, now);
    }
}
