//! Chat-completion client
//!
//! One blocking (awaited) POST per prompt against an OpenAI-compatible
//! endpoint. No streaming, no retry.

use crate::config::LlmConfig;
use crate::error::{IndigoError, Result};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

// Fixed sampling parameters; the interpreter's truncation repair exists
// because replies can run into this token limit.
const TEMPERATURE: f64 = 0.9;
const MAX_TOKENS: u32 = 1643;
const USER_ROLE: &str = "user";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Client for the chat-completion endpoint
pub struct CompletionClient {
    client: Client,
    config: LlmConfig,
}

impl CompletionClient {
    /// Create a new client for the configured endpoint.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("indigoctl/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IndigoError::completion(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Send one user-role message and return the first choice's content.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: USER_ROLE,
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!("POST {url} (model {})", self.config.model);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| IndigoError::completion(format!("ChatCompletion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndigoError::completion(format!(
                "ChatCompletion returned {status}: {body}"
            )));
        }

        let reply: ChatResponse = response.json().await.map_err(|e| {
            IndigoError::completion(format!("ChatCompletion reply was not valid JSON: {e}"))
        })?;
        let first = reply.choices.into_iter().next().ok_or_else(|| {
            IndigoError::completion("ChatCompletion reply contained no choices")
        })?;
        Ok(first.message.content)
    }
}
