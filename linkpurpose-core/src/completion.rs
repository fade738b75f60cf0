//! Text completion capability and its Anthropic Messages API client.

use crate::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sends a prompt, returns whatever text comes back. No structure is
/// promised.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl CompletionConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 8192,
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Read the API key from `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CheckError::InvalidConfiguration(format!("{} is not set", API_KEY_ENV))
            })?;
        Ok(Self::new(api_key))
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

pub struct AnthropicClient {
    client: Client,
    config: CompletionConfig,
}

impl AnthropicClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("linkpurpose/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl TextCompletion for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/messages", self.config.api_base_url.trim_end_matches('/'));
        debug!("Requesting completion from {} ({})", url, self.config.model);

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::Completion(format!(
                "HTTP {}: {}",
                status,
                truncate(&body, 300)
            )));
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(CheckError::Completion(
                "response contained no text content".to_string(),
            ));
        }
        Ok(text)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
