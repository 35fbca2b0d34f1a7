//! Application state for the chat server

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::generation::GenerationDispatcher;
use crate::providers::{EmbeddingProvider, GeminiClient};
use crate::retrieval::{DocumentStore, Retriever};

/// Shared application state
///
/// Constructed once at startup and passed into every request handler;
/// holds the store handle, the embedding client, and the generation
/// backends.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: Config,
    /// Corpus ingestion and similarity search
    retriever: Retriever,
    /// Generation backends
    dispatcher: GenerationDispatcher,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        tracing::info!("Initializing chat service state...");

        std::fs::create_dir_all(&config.storage.upload_dir)?;

        let store = Arc::new(DocumentStore::open(config.storage.snapshot_path())?);
        tracing::info!("Document store opened ({} chunks resident)", store.len());

        let gemini = Arc::new(GeminiClient::new(&config.gemini));
        tracing::info!(
            "Gemini client initialized (embedding: {}, {} dimensions)",
            config.gemini.embed_model,
            gemini.dimensions()
        );

        let retriever = Retriever::new(
            Arc::clone(&store),
            Arc::clone(&gemini) as Arc<dyn EmbeddingProvider>,
            config.retrieval.top_k,
        );

        let dispatcher = GenerationDispatcher::new(&config, gemini);
        tracing::info!("Generation dispatcher initialized (3 backends)");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                retriever,
                dispatcher,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the retriever
    pub fn retriever(&self) -> &Retriever {
        &self.inner.retriever
    }

    /// Get the generation dispatcher
    pub fn dispatcher(&self) -> &GenerationDispatcher {
        &self.inner.dispatcher
    }
}
