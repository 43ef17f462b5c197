use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, CompletionRequest};
use crate::config::DEFAULT_BASE_URL;
use crate::state::ChatMessage;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeErrorBody {
    error: ClaudeErrorDetail,
}

#[derive(Deserialize)]
struct ClaudeErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

#[derive(Clone)]
pub struct ClaudeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ClaudeClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub async fn query(&self, model: &str, max_tokens: u32, messages: &[ChatMessage]) -> Result<String> {
        let request = ClaudeRequest {
            model,
            max_tokens,
            messages,
        };
        let url = format!("{}/v1/messages", self.base_url);

        tracing::debug!(%url, model, messages = messages.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("failed to reach Claude API")?;

        let status = response.status();
        tracing::debug!(%status, "completion response received");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ClaudeErrorBody>(&text) {
                Ok(body) => anyhow!(
                    "Claude API error {}: {}: {}",
                    status,
                    body.error.kind,
                    body.error.message
                ),
                Err(_) => anyhow!("Claude API error {}: {}", status, text),
            });
        }

        let claude_response: ClaudeResponse = response
            .json()
            .await
            .context("malformed response from Claude API")?;

        first_text(claude_response)
    }
}

fn first_text(response: ClaudeResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .find_map(|block| block.text)
        .ok_or_else(|| anyhow!("Claude API response contained no text"))
}

#[async_trait]
impl CompletionClient for ClaudeClient {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String> {
        self.query(request.model, request.max_tokens, request.messages)
            .await
    }
}
