//! Provider abstractions for embeddings and answer generation
//!
//! Trait-based seams allow swapping backends and substituting stubs in
//! tests; the `Provider` enum closes the set of generation backends.

pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod openrouter;
pub mod sse;

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::GenerationProvider;
pub use openrouter::OpenRouterClient;

/// The closed set of generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Native Gemini streaming API
    Gemini,
    /// Deepseek model family via the OpenRouter gateway
    Deepseek,
    /// OpenAI model family via the OpenRouter gateway
    OpenAi,
}

impl Provider {
    /// Resolve a caller-supplied provider name, case-insensitively.
    ///
    /// Any unrecognized value resolves to `Provider::Gemini` — the fallback
    /// is deliberate so a misspelled choice degrades to the default backend
    /// instead of failing the request.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Self::Deepseek,
            "openai" => Self::OpenAi,
            _ => Self::Gemini,
        }
    }

    /// Lowercase provider name for logging and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Deepseek => "deepseek",
            Self::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
