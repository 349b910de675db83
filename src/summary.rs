//! Summary generator: one deterministic LLM call over normalized profile data.

use std::sync::Arc;

use serde_json::Value;

use crate::error::GenerationError;
use crate::llm::{ChatMessage, LlmClient};

/// Greedy sampling, for reproducible summaries.
pub const SUMMARY_TEMPERATURE: f32 = 0.0;

/// Render the summary prompt for `information`.
///
/// Objects and arrays are embedded as indented JSON (keys are sorted, so the
/// output is stable), strings verbatim, anything else via `to_string`.
pub fn render_prompt(information: &Value) -> String {
    let information = match information {
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(information).unwrap_or_else(|_| information.to_string())
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    format!(
        r#"given the Linkedin information {information} about a person, I want you to create a:
1. A short summary of the person's profile
2. two interesting facts about the person with pointers as "-" with title as "Interesting Facts" section. Create a section only if there are facts."#
    )
}

/// Turns a profile record into prose with a single LLM call.
pub struct SummaryGenerator {
    llm: Arc<dyn LlmClient>,
}

impl SummaryGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Summarize `profile`. The LLM's text is returned as-is.
    #[tracing::instrument(skip_all)]
    pub async fn summarize(&self, profile: &Value) -> Result<String, GenerationError> {
        let prompt = render_prompt(profile);
        tracing::debug!(prompt_len = prompt.len(), "Requesting summary");

        let response = self
            .llm
            .chat_completion(&[ChatMessage::user(prompt)], None, SUMMARY_TEMPERATURE)
            .await?;

        response
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}
