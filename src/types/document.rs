//! Corpus chunk and retrieval result types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of stored text with its embedding
///
/// A document is embedded as a single chunk; the store performs no
/// sub-document splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub text: String,
    /// Embedding vector
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: String, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            embedding,
        }
    }
}

/// A passage returned by similarity search, most relevant first
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedPassage {
    /// Passage text
    pub text: String,
    /// Similarity score (higher is more similar)
    pub score: f32,
}
