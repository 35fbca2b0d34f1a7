//! Generation provider trait

use crate::error::Result;
use async_trait::async_trait;

/// Trait for LLM answer generation
///
/// Implementations:
/// - `GeminiClient`: native Gemini streaming API
/// - `OpenRouterClient`: OpenAI-compatible SSE gateway (Deepseek, OpenAI)
///
/// `generate` consumes the provider's entire response — streamed or not —
/// and returns one aggregated string; streaming never crosses this seam.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate an answer for the prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging and error tagging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
