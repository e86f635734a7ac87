use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::SuggestionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; nothing in it changes while the server runs.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable model backend. Default: Ollama. Swap via LLM_PROVIDER.
    pub backend: Arc<dyn SuggestionBackend>,
}
