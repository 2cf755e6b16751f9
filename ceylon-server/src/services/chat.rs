//! Chat completion proxy
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint over plain REST.
//! Stateless: every call sends the system prompt plus one user message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Prompt sent ahead of every user message
pub const SYSTEM_PROMPT: &str = "You are the Ceylon Travels assistant. Help travellers plan trips in Sri Lanka: \
destinations, tour packages, hotels, transport, weather and local customs. Keep answers short and friendly.";

/// Returned when the upstream answered without any usable choice
pub const FALLBACK_REPLY: &str = "Sorry, I don't have an answer for that right now.";

/// Returned to the caller when the upstream call fails
pub const ERROR_REPLY: &str = "Sorry, something went wrong. Please try again later.";

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat backend is not configured")]
    NotConfigured,

    #[error("Chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Chat upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

/// Something that turns one user message into one reply
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn reply(&self, message: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, or the fallback reply
    fn into_reply(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

/// reqwest-backed OpenAI-compatible backend
pub struct OpenAiChat {
    client: reqwest::Client,
    config: ChatConfig,
}

impl OpenAiChat {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatBackend for OpenAiChat {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let api_key = self.config.api_key.as_deref().ok_or(ChatError::NotConfigured)?;

        let body = CompletionRequest {
            model: &self.config.model,
            messages: [
                CompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                CompletionMessage {
                    role: "user",
                    content: message,
                },
            ],
        };

        let resp = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = resp.json().await?;
        Ok(completion.into_reply())
    }
}
