//! AI-generated commit messages
//!
//! A chat-completion endpoint is asked for a conventional commit message
//! describing a diff. Handlers depend on [`MessageGenerator`] only.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::{AiError, Result};
use crate::http::{self, HttpRequest};
use crate::process::ProcessRunner;

pub const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const TEMPERATURE: f64 = 0.7;

/// Produces a commit message for a diff
pub trait MessageGenerator {
    fn generate(&self, diff: &str) -> Result<String>;
}

/// Prompt asking for a conventional commit message describing `diff`
pub fn build_prompt(diff: &str) -> String {
    format!(
        "Generate a conventional commit message for the following git diff:\n\
         \n\
         {diff}\n\
         \n\
         The commit message should:\n\
         1. Follow the format: <type>(<optional scope>): <description>\n\
         2. Use one of these types: feat, fix, docs, style, refactor, test, chore\n\
         3. Be concise but descriptive\n\
         4. Focus on the \"what\" and \"why\" rather than the \"how\"\n\
         5. Use imperative mood (\"add\" not \"added\")\n\
         \n\
         Return only the commit message without any additional text."
    )
}

/// Chat-completion client reached through `curl`
pub struct OpenAiClient<'a> {
    runner: &'a dyn ProcessRunner,
    api_key: String,
    model: String,
}

impl<'a> OpenAiClient<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl MessageGenerator for OpenAiClient<'_> {
    #[instrument(skip_all, fields(model = %self.model, diff_len = diff.len()))]
    fn generate(&self, diff: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": build_prompt(diff) }],
            "temperature": TEMPERATURE,
        });
        let request = HttpRequest::new("POST", COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body);

        let response = http::send(self.runner, &request)?;
        if !response.is_success() {
            return Err(AiError::Api {
                status: response.status,
                message: response.error_message(),
            }
            .into());
        }

        let parsed: CompletionResponse = response.json()?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|m| !m.is_empty())
            .ok_or(AiError::EmptyResponse)?;
        Ok(message)
    }
}
