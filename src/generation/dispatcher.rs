//! Provider-polymorphic generation dispatch

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::providers::{GeminiClient, GenerationProvider, OpenRouterClient, Provider};

/// Routes a prompt to one of the three generation backends.
///
/// The Gemini client is shared with the embedding path; the gateway clients
/// are owned here. Each backend consumes its stream fully and returns one
/// aggregated string. No retries, no caching.
pub struct GenerationDispatcher {
    gemini: Arc<GeminiClient>,
    deepseek: Arc<OpenRouterClient>,
    openai: Arc<OpenRouterClient>,
}

impl GenerationDispatcher {
    /// Create a dispatcher sharing the given Gemini client
    pub fn new(config: &Config, gemini: Arc<GeminiClient>) -> Self {
        Self {
            gemini,
            deepseek: Arc::new(OpenRouterClient::deepseek(&config.openrouter)),
            openai: Arc::new(OpenRouterClient::openai(&config.openrouter)),
        }
    }

    /// Generate an aggregated answer with the selected provider
    pub async fn generate(&self, prompt: &str, provider: Provider) -> Result<String> {
        let backend: &dyn GenerationProvider = match provider {
            Provider::Gemini => self.gemini.as_ref(),
            Provider::Deepseek => self.deepseek.as_ref(),
            Provider::OpenAi => self.openai.as_ref(),
        };

        tracing::info!(
            "Generating answer with {} ({})",
            backend.name(),
            backend.model()
        );

        backend.generate(prompt).await
    }
}
