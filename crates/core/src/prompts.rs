//! Guided prompt catalog for the collection wizard.
//!
//! The catalog is fixed at build time. Its length is the wizard length:
//! one prompt per step, shown in order.

use serde::Serialize;

/// Topic a guided prompt draws out of the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptCategory {
    Introduction,
    Challenge,
    Solution,
    Results,
    Recommendation,
}

/// One question/step template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidedPrompt {
    pub id: &'static str,
    pub category: PromptCategory,
    pub question: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    /// Minimum character count for a written answer.
    pub min_length: usize,
    /// Suggested recording length in seconds.
    pub suggested_duration: u32,
}

/// Longest a single recording may run, in seconds.
pub const MAX_RECORDING_DURATION: u32 = 300;

/// The ordered prompt catalog.
pub static GUIDED_PROMPTS: &[GuidedPrompt] = &[
    GuidedPrompt {
        id: "intro",
        category: PromptCategory::Introduction,
        question: "Tell us a little about yourself",
        description: "Your name, role, and what your company does.",
        placeholder: "I'm the head of growth at...",
        min_length: 20,
        suggested_duration: 30,
    },
    GuidedPrompt {
        id: "challenge",
        category: PromptCategory::Challenge,
        question: "What problem were you trying to solve?",
        description: "Describe the situation before you found us.",
        placeholder: "Before, we struggled with...",
        min_length: 50,
        suggested_duration: 45,
    },
    GuidedPrompt {
        id: "solution",
        category: PromptCategory::Solution,
        question: "How did our product help?",
        description: "Which features made the difference and why.",
        placeholder: "The feature that stood out was...",
        min_length: 50,
        suggested_duration: 60,
    },
    GuidedPrompt {
        id: "results",
        category: PromptCategory::Results,
        question: "What results have you seen?",
        description: "Numbers, time saved, or outcomes you can share.",
        placeholder: "Since switching, we have...",
        min_length: 40,
        suggested_duration: 45,
    },
    GuidedPrompt {
        id: "recommendation",
        category: PromptCategory::Recommendation,
        question: "Would you recommend us, and to whom?",
        description: "Who would benefit most from what you experienced.",
        placeholder: "I'd recommend it to anyone who...",
        min_length: 20,
        suggested_duration: 30,
    },
];

/// Total number of wizard steps.
pub fn total_prompts() -> usize {
    GUIDED_PROMPTS.len()
}
