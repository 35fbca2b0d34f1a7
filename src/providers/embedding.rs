//! Embedding provider trait

use crate::error::Result;
use async_trait::async_trait;

/// Trait for generating text embeddings
///
/// Used both at ingestion and at query time, so both sides of retrieval
/// live in the same embedding space.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimensions (e.g. 768 for embedding-001)
    fn dimensions(&self) -> usize;

    /// Provider name for logging
    fn name(&self) -> &str;
}
