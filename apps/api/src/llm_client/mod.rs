//! LLM Client: the single point of entry for all model calls in the service.
//!
//! Every backend takes one fully composed prompt and returns one complete
//! text completion. No streaming, no retries: a failed call is reported
//! straight back to the request that made it.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::{LlmConfig, LlmProvider};

pub mod anthropic;
pub mod ollama;

pub use anthropic::AnthropicBackend;
pub use ollama::OllamaBackend;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A generative text model addressed by model identifier and a fixed
/// sampling temperature.
///
/// Carried in `AppState` as `Arc<dyn SuggestionBackend>`.
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Sends `prompt` and waits for the whole completion.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Builds the backend selected by `LLM_PROVIDER`.
pub fn build_backend(config: &LlmConfig) -> Result<Arc<dyn SuggestionBackend>> {
    let client = Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let backend: Arc<dyn SuggestionBackend> = match config.provider {
        LlmProvider::Ollama => Arc::new(OllamaBackend::new(
            client,
            config.ollama_url.clone(),
            config.model.clone(),
            config.temperature,
        )),
        LlmProvider::Anthropic => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the anthropic provider")?;
            Arc::new(AnthropicBackend::new(
                client,
                api_key,
                config.model.clone(),
                config.temperature,
            ))
        }
    };

    Ok(backend)
}

/// Reads a non-success response body, preferring a structured message if
/// `extract` can find one.
async fn api_error<F>(response: reqwest::Response, extract: F) -> LlmError
where
    F: FnOnce(&str) -> Option<String>,
{
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = extract(&body).unwrap_or(body);
    LlmError::Api { status, message }
}
