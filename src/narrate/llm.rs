//! LLM-backed narrator
//!
//! Model-agnostic HTTP client supporting both Anthropic and
//! OpenAI-compatible APIs (DeepSeek, etc). The LLM writes PROSE only;
//! combat mechanics are resolved before narration is requested.

use crate::core::error::{CombatError, Result};
use crate::narrate::{Narrator, RoundSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = "You narrate rounds of a grim low-fantasy skirmish. \
You will receive a round number, a location, and a list of mechanical facts. \
Rewrite them as two or three sentences of vivid second-person prose. \
Never invent events, damage numbers, or outcomes not present in the facts.";

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Async narrator backed by an LLM API
pub struct LlmNarrator {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
}

impl LlmNarrator {
    /// Create a narrator with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            api_format,
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            // DeepSeek, OpenAI, and other compatible APIs use OpenAI format
            ApiFormat::OpenAI
        }
    }

    /// Create a narrator from environment variables
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL (defaults to Anthropic API)
    /// Optional: LLM_MODEL (defaults to claude-3-haiku-20240307)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| CombatError::Narration("LLM_API_KEY not set".into()))?;
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "claude-3-haiku-20240307".into());

        Ok(Self::new(api_key, api_url, model))
    }

    fn user_prompt(summary: &RoundSummary) -> String {
        let mut prompt = format!(
            "Round {} at {}.\nFacts:\n",
            summary.round, summary.location
        );
        for line in &summary.action_lines {
            prompt.push_str("- ");
            prompt.push_str(line);
            prompt.push('\n');
        }
        if let Some(outcome) = summary.outcome {
            prompt.push_str(&format!("- The combat ends: {:?}.\n", outcome));
        }
        prompt
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAI => self.complete_openai(system, user).await,
        }
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            system: system.into(),
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CombatError::Narration(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CombatError::Narration(format!("API error: {}", error_text)));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| CombatError::Narration(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| CombatError::Narration("Empty response".into()))
    }

    async fn complete_openai(&self, system: &str, user: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: system.into(),
                },
                Message {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CombatError::Narration(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CombatError::Narration(format!("API error: {}", error_text)));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| CombatError::Narration(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| CombatError::Narration("Empty response".into()))
    }
}

#[async_trait]
impl Narrator for LlmNarrator {
    async fn narrate_round(&self, summary: &RoundSummary) -> Result<String> {
        let prompt = Self::user_prompt(summary);
        self.complete(SYSTEM_PROMPT, &prompt).await
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format (DeepSeek, OpenAI, etc.)
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatOutcome;

    #[test]
    fn test_format_detection() {
        let n = LlmNarrator::new(
            "k".into(),
            "https://api.anthropic.com/v1/messages".into(),
            "m".into(),
        );
        assert_eq!(n.api_format, ApiFormat::Anthropic);

        let n = LlmNarrator::new("k".into(), "https://api.deepseek.com/v1".into(), "m".into());
        assert_eq!(n.api_format, ApiFormat::OpenAI);
    }

    #[test]
    fn test_user_prompt_carries_facts() {
        let mut summary = RoundSummary::new(2, "Gravemarsh");
        summary.action_lines.push("Wren strikes for 7.".into());
        summary.outcome = Some(CombatOutcome::Victory);
        let prompt = LlmNarrator::user_prompt(&summary);
        assert!(prompt.contains("Round 2 at Gravemarsh"));
        assert!(prompt.contains("- Wren strikes for 7."));
        assert!(prompt.contains("Victory"));
    }
}
