//! LLM gateway for Wayfinder
//!
//! Provides the completion trait, the OpenRouter implementation, and the
//! structured-response parser that recovers JSON from raw model output.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod extract;
mod openrouter;

pub use client::{CompletionRequest, CompletionResponse, LlmClient, TokenUsage};
pub use error::LlmError;
pub use extract::{extract_json, flexible_f64};
pub use openrouter::OpenRouterClient;

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Currently supports "openrouter" (any OpenAI-compatible chat-completions
/// endpoint works by pointing `base-url` at it).
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openrouter" => Ok(Arc::new(OpenRouterClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: openrouter",
            other
        ))),
    }
}
