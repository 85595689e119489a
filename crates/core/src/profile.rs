use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A therapy subject: goals, challenges and a history of emotional states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub emotional_states: Vec<EmotionalState>,
    pub preferred_method: Option<String>,
    #[serde(default)]
    pub session_count: u32,
    pub last_session_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(input: ProfileInput, now: DateTime<Utc>) -> Result<Self, CoreError> {
        input.validate()?;
        Ok(Self {
            id: crate::new_id(),
            user_id: input.user_id,
            name: input.name.trim().to_owned(),
            description: input.description,
            goals: input.goals,
            challenges: input.challenges,
            emotional_states: Vec::new(),
            preferred_method: input.preferred_method,
            session_count: 0,
            last_session_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update. Fields left as `None` are untouched.
    pub fn apply_update(&mut self, update: ProfileUpdate, now: DateTime<Utc>) -> Result<(), CoreError> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(CoreError::InvalidInput("profile name must not be empty".to_owned()));
            }
            self.name = name.trim().to_owned();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(goals) = update.goals {
            self.goals = goals;
        }
        if let Some(challenges) = update.challenges {
            self.challenges = challenges;
        }
        if let Some(method) = update.preferred_method {
            self.preferred_method = Some(method);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Most recent emotional state, if any has been recorded.
    #[must_use]
    pub fn current_emotional_state(&self) -> Option<&EmotionalState> {
        self.emotional_states.iter().max_by_key(|s| s.recorded_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInput {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    pub preferred_method: Option<String>,
}

impl ProfileInput {
    fn validate(&self) -> Result<(), CoreError> {
        if self.user_id.trim().is_empty() {
            return Err(CoreError::InvalidInput("user_id must not be empty".to_owned()));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("profile name must not be empty".to_owned()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goals: Option<Vec<String>>,
    pub challenges: Option<Vec<String>>,
    pub preferred_method: Option<String>,
}

/// One point in a profile's emotional-state history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmotionalState {
    pub recorded_at: DateTime<Utc>,
    pub mood: String,
    /// 1 (barely noticeable) to 10 (overwhelming).
    pub intensity: u8,
    pub note: Option<String>,
}

impl EmotionalState {
    pub const MIN_INTENSITY: u8 = 1;
    pub const MAX_INTENSITY: u8 = 10;

    pub fn new(
        mood: &str,
        intensity: u8,
        note: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if mood.trim().is_empty() {
            return Err(CoreError::InvalidInput("mood must not be empty".to_owned()));
        }
        if !(Self::MIN_INTENSITY..=Self::MAX_INTENSITY).contains(&intensity) {
            return Err(CoreError::InvalidInput(format!(
                "intensity must be between {} and {}, got {intensity}",
                Self::MIN_INTENSITY,
                Self::MAX_INTENSITY
            )));
        }
        Ok(Self { recorded_at, mood: mood.trim().to_lowercase(), intensity, note })
    }
}

/// Client-supplied part of an [`EmotionalState`]; the timestamp is assigned
/// on receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalStateInput {
    pub mood: String,
    pub intensity: u8,
    pub note: Option<String>,
}

impl EmotionalStateInput {
    pub fn into_state(self, recorded_at: DateTime<Utc>) -> Result<EmotionalState, CoreError> {
        EmotionalState::new(&self.mood, self.intensity, self.note, recorded_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input() -> ProfileInput {
        ProfileInput {
            user_id: "user-1".to_owned(),
            name: "  Alex ".to_owned(),
            description: None,
            goals: vec!["sleep better".to_owned()],
            challenges: vec![],
            preferred_method: Some("cbt".to_owned()),
        }
    }

    #[test]
    fn new_profile_trims_name_and_starts_empty() {
        let now = Utc::now();
        let profile = Profile::new(input(), now).unwrap();
        assert_eq!(profile.name, "Alex");
        assert_eq!(profile.session_count, 0);
        assert!(profile.emotional_states.is_empty());
        assert_eq!(profile.created_at, profile.updated_at);
    }

    #[test]
    fn new_profile_rejects_blank_name() {
        let mut bad = input();
        bad.name = "   ".to_owned();
        assert!(Profile::new(bad, Utc::now()).is_err());
    }

    #[test]
    fn update_keeps_untouched_fields() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut profile = Profile::new(input(), created).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        profile
            .apply_update(
                ProfileUpdate { challenges: Some(vec!["anxiety".to_owned()]), ..Default::default() },
                later,
            )
            .unwrap();
        assert_eq!(profile.goals, vec!["sleep better".to_owned()]);
        assert_eq!(profile.challenges, vec!["anxiety".to_owned()]);
        assert_eq!(profile.updated_at, later);
    }

    #[test]
    fn emotional_state_intensity_bounds() {
        let now = Utc::now();
        assert!(EmotionalState::new("calm", 0, None, now).is_err());
        assert!(EmotionalState::new("calm", 11, None, now).is_err());
        let state = EmotionalState::new(" Anxious ", 7, None, now).unwrap();
        assert_eq!(state.mood, "anxious");
    }

    #[test]
    fn current_emotional_state_is_latest() {
        let mut profile = Profile::new(input(), Utc::now()).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
        profile.emotional_states.push(EmotionalState::new("hopeful", 4, None, late).unwrap());
        profile.emotional_states.push(EmotionalState::new("low", 6, None, early).unwrap());
        assert_eq!(profile.current_emotional_state().map(|s| s.mood.as_str()), Some("hopeful"));
    }
}
