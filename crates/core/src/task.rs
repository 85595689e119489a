use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A therapeutic assignment with a due date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub profile_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        user_id: String,
        profile_id: String,
        input: TaskInput,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if input.title.trim().is_empty() {
            return Err(CoreError::InvalidInput("task title must not be empty".to_owned()));
        }
        Ok(Self {
            id: crate::new_id(),
            user_id,
            profile_id,
            title: input.title.trim().to_owned(),
            description: input.description,
            due_date: input.due_date,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, update: TaskUpdate, now: DateTime<Utc>) -> Result<(), CoreError> {
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(CoreError::InvalidInput("task title must not be empty".to_owned()));
            }
            self.title = title.trim().to_owned();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Sets the completion flag; `completed_at` follows it.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if self.completed != completed {
            self.completed = completed;
            self.completed_at = completed.then_some(now);
        }
        self.updated_at = now;
    }
}
