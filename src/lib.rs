//! docchat: single-document RAG chat service
//!
//! One PDF is resident at a time: uploading a document replaces the whole
//! corpus, chat turns are answered by an LLM grounded in retrieved content
//! and the conversation history. Three generation backends sit behind one
//! dispatcher: the native Gemini streaming API, and the Deepseek and OpenAI
//! model families via the OpenRouter gateway.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use providers::Provider;
pub use types::{
    chat::{ChatRequest, ChatResponse, ChatTurn, Role},
    document::{Chunk, RetrievedPassage},
};
