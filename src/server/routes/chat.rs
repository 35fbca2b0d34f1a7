//! Chat endpoint with retrieval-grounded generation

use axum::{extract::State, Json};

use crate::error::Result;
use crate::generation::prompt::{self, PromptBuilder};
use crate::providers::Provider;
use crate::server::state::AppState;
use crate::types::chat::{ChatRequest, ChatResponse};

/// POST /chat - Answer a message grounded in the resident document
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    tracing::info!("Chat: \"{}\"", request.message);

    // Bare greetings get the canned reply without touching retrieval or
    // any generation backend.
    if prompt::is_greeting(&request.message) {
        return Ok(Json(ChatResponse {
            response: prompt::GREETING_REPLY.to_string(),
        }));
    }

    let provider = Provider::from_name(&request.model);

    let passages = state.retriever().retrieve(&request.message).await?;
    tracing::debug!("Retrieved {} passages", passages.len());

    let grounding = PromptBuilder::compose(&request.message, &request.history, &passages);

    let answer = state.dispatcher().generate(&grounding, provider).await?;

    Ok(Json(ChatResponse { response: answer }))
}
