//! Durable single-document corpus store

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::document::{Chunk, RetrievedPassage};

/// On-disk corpus snapshot
#[derive(Serialize, Deserialize)]
struct CorpusSnapshot {
    saved_at: DateTime<Utc>,
    chunks: Vec<Chunk>,
}

/// Corpus store holding at most one document's chunks.
///
/// `replace_all` is the only mutation: every ingestion swaps the whole
/// corpus under a single write-lock acquisition, so concurrent ingests
/// serialize and readers never observe a mixed corpus. The snapshot is
/// persisted before the in-memory swap; a failed write leaves the previous
/// corpus fully intact.
pub struct DocumentStore {
    snapshot_path: PathBuf,
    corpus: RwLock<Vec<Chunk>>,
}

impl DocumentStore {
    /// Open a store, loading any existing snapshot from disk
    pub fn open(snapshot_path: PathBuf) -> Result<Self> {
        if let Some(parent) = snapshot_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let corpus = Self::load_snapshot(&snapshot_path);

        Ok(Self {
            snapshot_path,
            corpus: RwLock::new(corpus),
        })
    }

    fn load_snapshot(path: &PathBuf) -> Vec<Chunk> {
        if !path.exists() {
            return Vec::new();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<CorpusSnapshot>(&content) {
                Ok(snapshot) => snapshot.chunks,
                Err(e) => {
                    tracing::warn!("Failed to parse corpus snapshot: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read corpus snapshot: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the entire corpus with a new document's chunks.
    ///
    /// Persists the new snapshot durably (temp file + rename), then swaps
    /// the in-memory corpus, all under one write lock.
    pub fn replace_all(&self, chunks: Vec<Chunk>) -> Result<()> {
        let mut corpus = self.corpus.write();

        self.persist(&chunks)?;
        *corpus = chunks;

        Ok(())
    }

    fn persist(&self, chunks: &[Chunk]) -> Result<()> {
        let snapshot = CorpusSnapshot {
            saved_at: Utc::now(),
            chunks: chunks.to_vec(),
        };
        let content = serde_json::to_string(&snapshot)
            .map_err(|e| Error::store_write(format!("failed to serialize corpus: {}", e)))?;

        let dir = self
            .snapshot_path
            .parent()
            .ok_or_else(|| Error::store_write("snapshot path has no parent directory"))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| Error::store_write(format!("failed to create temp file: {}", e)))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| Error::store_write(format!("failed to write snapshot: {}", e)))?;
        tmp.persist(&self.snapshot_path)
            .map_err(|e| Error::store_write(format!("failed to replace snapshot: {}", e)))?;

        Ok(())
    }

    /// The `k` most similar chunks to the query embedding, best first.
    ///
    /// Ties break on chunk ID so a fixed corpus and query always produce
    /// the same ordering.
    pub fn top_k(&self, query_embedding: &[f32], k: usize) -> Vec<RetrievedPassage> {
        let corpus = self.corpus.read();

        let mut scored: Vec<(f32, &Chunk)> = corpus
            .iter()
            .map(|chunk| (cosine_similarity(query_embedding, &chunk.embedding), chunk))
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(score, chunk)| RetrievedPassage {
                text: chunk.text.clone(),
                score,
            })
            .collect()
    }

    /// Number of resident chunks
    pub fn len(&self) -> usize {
        self.corpus.read().len()
    }

    /// Whether the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.corpus.read().is_empty()
    }
}

/// Cosine similarity; zero-magnitude vectors score 0.0
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn chunk(text: &str, embedding: Vec<f32>) -> Chunk {
        Chunk::new(text.to_string(), embedding)
    }

    #[test]
    fn cosine_similarity_basics() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn empty_corpus_yields_no_passages() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("corpus.json")).unwrap();
        assert!(store.is_empty());
        assert!(store.top_k(&[1.0, 0.0], 10).is_empty());
    }

    #[test]
    fn replace_discards_previous_corpus() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("corpus.json")).unwrap();

        store
            .replace_all(vec![chunk("first document", vec![1.0, 0.0])])
            .unwrap();
        store
            .replace_all(vec![chunk("second document", vec![0.0, 1.0])])
            .unwrap();

        assert_eq!(store.len(), 1);
        let hits = store.top_k(&[1.0, 0.0], 10);
        assert_eq!(hits.len(), 1);
        assert!(hits.iter().all(|p| !p.text.contains("first")));
    }

    #[test]
    fn top_k_bounds_result_size() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("corpus.json")).unwrap();

        let chunks: Vec<Chunk> = (0..12)
            .map(|i| chunk(&format!("chunk {}", i), vec![1.0, i as f32]))
            .collect();
        store.replace_all(chunks).unwrap();

        assert_eq!(store.top_k(&[1.0, 0.0], 10).len(), 10);

        let chunks: Vec<Chunk> = (0..3)
            .map(|i| chunk(&format!("chunk {}", i), vec![1.0, i as f32]))
            .collect();
        store.replace_all(chunks).unwrap();

        assert_eq!(store.top_k(&[1.0, 0.0], 10).len(), 3);
    }

    #[test]
    fn results_ordered_most_similar_first() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("corpus.json")).unwrap();

        store
            .replace_all(vec![
                chunk("orthogonal", vec![0.0, 1.0]),
                chunk("aligned", vec![1.0, 0.0]),
                chunk("diagonal", vec![1.0, 1.0]),
            ])
            .unwrap();

        let hits = store.top_k(&[1.0, 0.0], 10);
        assert_eq!(hits[0].text, "aligned");
        assert_eq!(hits[1].text, "diagonal");
        assert_eq!(hits[2].text, "orthogonal");
        assert!(hits[0].score >= hits[1].score && hits[1].score >= hits[2].score);
    }

    #[test]
    fn retrieval_is_deterministic() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("corpus.json")).unwrap();

        // identical embeddings force the ID tie-break
        store
            .replace_all(vec![
                chunk("twin a", vec![1.0, 1.0]),
                chunk("twin b", vec![1.0, 1.0]),
                chunk("twin c", vec![1.0, 1.0]),
            ])
            .unwrap();

        let first: Vec<String> = store
            .top_k(&[1.0, 1.0], 10)
            .into_iter()
            .map(|p| p.text)
            .collect();
        let second: Vec<String> = store
            .top_k(&[1.0, 1.0], 10)
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.json");

        {
            let store = DocumentStore::open(path.clone()).unwrap();
            store
                .replace_all(vec![chunk("durable text", vec![0.5, 0.5])])
                .unwrap();
        }

        let reopened = DocumentStore::open(path).unwrap();
        assert_eq!(reopened.len(), 1);
        let hits = reopened.top_k(&[0.5, 0.5], 10);
        assert_eq!(hits[0].text, "durable text");
    }

    #[test]
    fn corrupt_snapshot_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = DocumentStore::open(path).unwrap();
        assert!(store.is_empty());
    }
}
