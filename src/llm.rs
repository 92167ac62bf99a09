//! Completion backend used by the feedback server.
//!
//! The server forwards each feedback request to an OpenAI-compatible Chat
//! Completions API. Configuration is via environment variables:
//! - `OPENAI_API_KEY` - API key (required to serve feedback)
//! - `OPENAI_MODEL` - Model name (default: `gpt-4`)
//! - `OPENAI_BASE_URL` - API root (default: `https://api.openai.com/v1`)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::FeedbackRequest;

const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1000;

const SYSTEM_PROMPT: &str = "You are a teaching assistant who helps students learn to write better code. When you review code:

1. Evaluate it against the rubric criteria you are given.
2. Give constructive feedback that encourages learning.
3. Point to the specific parts of the code that need work.
4. Offer hints and guiding questions rather than answers.
5. Never write complete solutions or direct code fixes.
6. Explain the concepts and good practices behind each issue.
7. Use small examples only to illustrate a concept.
8. Encourage the student to reason about their own code.
9. Refer to the rubric criteria by name.
10. Keep a supportive, encouraging tone.

The goal is understanding, not a finished assignment.";

/// Errors from the completion provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OpenAI API key not configured")]
    MissingApiKey,

    #[error("Completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Provider returned no content")]
    EmptyResponse,
}

/// System and user messages for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the tutoring prompt for a feedback request.
pub fn tutoring_prompt(request: &FeedbackRequest) -> Prompt {
    let user = format!(
        "Please review this code and give educational feedback.

CODE TO REVIEW:
```
{code}
```

RUBRIC CRITERIA:
{rubric}

STUDENT'S QUESTION:
{question}

Structure your answer so that it:
1. Acknowledges the student's question
2. Refers to specific rubric criteria
3. Highlights areas for improvement
4. Gives conceptual hints and suggestions
5. Mentions documentation or learning resources where relevant
6. Invites the student to think through specific improvements
7. Does NOT provide direct solutions or complete code fixes",
        code = request.code,
        rubric = request.rubric,
        question = request.user_question,
    );
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// Something that can turn a prompt into text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError>;
}

/// Settings for [`OpenAiBackend`].
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            ..defaults
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat Completions client for OpenAI and compatible providers.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: Client,
    config: LlmConfig,
}

impl OpenAiBackend {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(LlmConfig::from_env())
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                CompletionMessage {
                    role: "system",
                    content: &prompt.system,
                },
                CompletionMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(model = %self.config.model, "Creating chat completion");
        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}
