//! Retrieval: corpus ingestion and similarity search

pub mod store;

pub use store::DocumentStore;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::document::{Chunk, RetrievedPassage};

/// Bridges the async embedding provider and the sync document store.
///
/// Embedding calls never hold the store lock; store operations run on the
/// blocking pool.
pub struct Retriever {
    store: Arc<DocumentStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever
    pub fn new(store: Arc<DocumentStore>, embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    /// Ingest a document, replacing any previously resident corpus.
    ///
    /// The text is embedded as one chunk; trimmed-empty input fails before
    /// any mutation.
    pub async fn ingest(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let embedding = self.embedder.embed(text).await?;
        let chunk = Chunk::new(text.to_string(), embedding);

        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.replace_all(vec![chunk]))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        tracing::info!("Corpus replaced ({} chars)", text.len());
        Ok(())
    }

    /// Retrieve the passages most similar to the query, best first.
    ///
    /// An empty corpus yields an empty result without calling the embedder.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>> {
        if self.store.is_empty() {
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(query).await?;

        let store = Arc::clone(&self.store);
        let k = self.top_k;
        tokio::task::spawn_blocking(move || store.top_k(&embedding, k))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))
    }

    /// Number of resident chunks
    pub fn corpus_len(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::tempdir;

    /// Deterministic bag-of-bytes embedder for pipeline tests
    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0.0f32; 16];
            for b in text.bytes() {
                v[(b % 16) as usize] += 1.0;
            }
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            16
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn retriever(dir: &std::path::Path) -> Retriever {
        let store = Arc::new(DocumentStore::open(dir.join("corpus.json")).unwrap());
        Retriever::new(store, Arc::new(StubEmbedder), 10)
    }

    #[tokio::test]
    async fn ingest_rejects_empty_text() {
        let dir = tempdir().unwrap();
        let retriever = retriever(dir.path());

        let result = retriever.ingest("   \n\t ").await;
        assert!(matches!(result, Err(Error::EmptyDocument)));
        assert_eq!(retriever.corpus_len(), 0);
    }

    #[tokio::test]
    async fn empty_corpus_retrieval_is_empty() {
        let dir = tempdir().unwrap();
        let retriever = retriever(dir.path());

        let passages = retriever.retrieve("anything").await.unwrap();
        assert!(passages.is_empty());
    }

    #[tokio::test]
    async fn read_after_write() {
        let dir = tempdir().unwrap();
        let retriever = retriever(dir.path());

        retriever
            .ingest("The capital of France is Paris.")
            .await
            .unwrap();

        let passages = retriever.retrieve("capital of France").await.unwrap();
        assert_eq!(passages.len(), 1);
        assert!(passages[0].text.contains("Paris"));
    }

    #[tokio::test]
    async fn second_ingest_replaces_first() {
        let dir = tempdir().unwrap();
        let retriever = retriever(dir.path());

        retriever.ingest("document about whales").await.unwrap();
        retriever.ingest("document about trains").await.unwrap();

        let passages = retriever.retrieve("whales").await.unwrap();
        assert_eq!(passages.len(), 1);
        assert!(!passages[0].text.contains("whales"));
        assert!(passages[0].text.contains("trains"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_ingests_leave_one_document() {
        let dir = tempdir().unwrap();
        let retriever = Arc::new(retriever(dir.path()));

        let a = "document alpha, all about one topic";
        let b = "document beta, all about another topic";

        let r1 = Arc::clone(&retriever);
        let r2 = Arc::clone(&retriever);
        let (first, second) = tokio::join!(
            tokio::spawn(async move { r1.ingest(a).await }),
            tokio::spawn(async move { r2.ingest(b).await }),
        );
        first.unwrap().unwrap();
        second.unwrap().unwrap();

        // exactly one document resident, entirely A or entirely B
        assert_eq!(retriever.corpus_len(), 1);
        let passages = retriever.retrieve("document").await.unwrap();
        assert_eq!(passages.len(), 1);
        assert!(passages[0].text == a || passages[0].text == b);
    }
}
