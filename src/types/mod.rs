//! Wire and domain types

pub mod chat;
pub mod document;

pub use chat::{ChatRequest, ChatResponse, ChatTurn, Role, UploadResponse};
pub use document::{Chunk, RetrievedPassage};
