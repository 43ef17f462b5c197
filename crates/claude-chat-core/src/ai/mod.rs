pub mod claude;

pub use claude::ClaudeClient;

use anyhow::Result;
use async_trait::async_trait;

use crate::state::ChatMessage;

/// One completion call: the whole transcript plus the model parameters.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: &'a [ChatMessage],
}

/// A remote language-model service that answers with a single text reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String>;
}
