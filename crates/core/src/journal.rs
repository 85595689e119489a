use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Free-form journal entry written by the therapy subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub profile_id: String,
    pub content: String,
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalInput {
    pub content: String,
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl JournalEntry {
    pub fn new(
        user_id: String,
        profile_id: String,
        input: JournalInput,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let mut entry = Self {
            id: crate::new_id(),
            user_id,
            profile_id,
            content: String::new(),
            mood: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        entry.replace(input, now)?;
        Ok(entry)
    }

    /// Replaces the editable fields. Tags are lowercased and deduplicated.
    pub fn replace(&mut self, input: JournalInput, now: DateTime<Utc>) -> Result<(), CoreError> {
        if input.content.trim().is_empty() {
            return Err(CoreError::InvalidInput("journal content must not be empty".to_owned()));
        }
        let mut tags: Vec<String> = input
            .tags
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();
        self.content = input.content;
        self.mood = input.mood;
        self.tags = tags;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_normalized() {
        let entry = JournalEntry::new(
            "u".to_owned(),
            "p".to_owned(),
            JournalInput {
                content: "Slept well".to_owned(),
                mood: Some("rested".to_owned()),
                tags: vec!["Sleep".to_owned(), " sleep ".to_owned(), String::new(), "win".to_owned()],
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(entry.tags, vec!["sleep".to_owned(), "win".to_owned()]);
    }

    #[test]
    fn empty_content_rejected() {
        let result = JournalEntry::new(
            "u".to_owned(),
            "p".to_owned(),
            JournalInput { content: "\n".to_owned(), mood: None, tags: vec![] },
            Utc::now(),
        );
        assert!(result.is_err());
    }
}
