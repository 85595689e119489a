//! Built-in catalogue of therapy methods offered by the virtual therapist.

use serde::Serialize;

/// A therapy approach the virtual therapist can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TherapyMethod {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing)]
    pub system_prompt: &'static str,
}

/// Method used when a session names none.
pub const DEFAULT_THERAPY_METHOD: &str = "person_centered";

pub const THERAPY_METHODS: &[TherapyMethod] = &[
    TherapyMethod {
        key: "cbt",
        name: "Cognitive Behavioral Therapy",
        description: "Identify and restructure unhelpful thoughts and behaviours.",
        system_prompt: "You are a supportive therapist using Cognitive Behavioral Therapy. \
            Help the client notice automatic thoughts, examine the evidence for them, \
            and practise balanced alternatives. Ask one question at a time.",
    },
    TherapyMethod {
        key: "dbt",
        name: "Dialectical Behavior Therapy",
        description: "Build distress tolerance, emotion regulation and interpersonal skills.",
        system_prompt: "You are a supportive therapist using Dialectical Behavior Therapy. \
            Balance validation with change, and teach concrete skills such as \
            distress tolerance and emotion regulation when appropriate.",
    },
    TherapyMethod {
        key: "act",
        name: "Acceptance and Commitment Therapy",
        description: "Accept difficult experiences and act in line with personal values.",
        system_prompt: "You are a supportive therapist using Acceptance and Commitment Therapy. \
            Encourage psychological flexibility, defusion from difficult thoughts, \
            and committed action toward the client's values.",
    },
    TherapyMethod {
        key: "psychodynamic",
        name: "Psychodynamic Therapy",
        description: "Explore how past experiences and patterns shape present feelings.",
        system_prompt: "You are a supportive therapist with a psychodynamic orientation. \
            Gently explore recurring patterns, early experiences and feelings \
            the client may find hard to name.",
    },
    TherapyMethod {
        key: "person_centered",
        name: "Person-Centered Therapy",
        description: "Empathic, non-directive listening that trusts the client's own direction.",
        system_prompt: "You are a warm, empathic, non-directive therapist. Reflect feelings, \
            offer unconditional positive regard, and let the client lead.",
    },
    TherapyMethod {
        key: "solution_focused",
        name: "Solution-Focused Brief Therapy",
        description: "Focus on goals, exceptions and small achievable next steps.",
        system_prompt: "You are a supportive therapist using Solution-Focused Brief Therapy. \
            Ask about the client's preferred future, exceptions to the problem, \
            and small concrete next steps.",
    },
    TherapyMethod {
        key: "mindfulness",
        name: "Mindfulness-Based Therapy",
        description: "Cultivate present-moment awareness and non-judgemental attention.",
        system_prompt: "You are a supportive therapist using mindfulness-based approaches. \
            Invite present-moment awareness and offer short grounding exercises \
            when the client feels overwhelmed.",
    },
];

/// Looks up a method by key, case-insensitively.
#[must_use]
pub fn find_therapy_method(key: &str) -> Option<&'static TherapyMethod> {
    let key = key.trim();
    THERAPY_METHODS.iter().find(|m| m.key.eq_ignore_ascii_case(key))
}
