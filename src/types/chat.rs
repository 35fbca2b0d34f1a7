//! Chat request and response types

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The assistant
    Assistant,
}

impl Role {
    /// Transcript label for prompt rendering
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One prior conversation turn
///
/// History is owned by the caller and replayed on every request; the server
/// reads it for prompt composition and never stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Turn author
    pub role: Role,
    /// Turn text
    pub text: String,
}

impl ChatTurn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,

    /// Prior conversation turns, oldest first (default: empty)
    #[serde(default)]
    pub history: Vec<ChatTurn>,

    /// Requested generation provider (default: "Gemini"); unrecognized
    /// values resolve to the default provider rather than failing
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "Gemini".to_string()
}

/// Chat response body: one fully aggregated answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated answer
    pub response: String,
}

/// Upload response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable confirmation
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_and_model_default() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "what is this document about?"}"#).unwrap();
        assert!(request.history.is_empty());
        assert_eq!(request.model, "Gemini");
    }

    #[test]
    fn roles_round_trip_lowercase() {
        let turn: ChatTurn =
            serde_json::from_str(r#"{"role": "assistant", "text": "hello"}"#).unwrap();
        assert_eq!(turn.role, Role::Assistant);
        let json = serde_json::to_string(&ChatTurn::user("hi")).unwrap();
        assert!(json.contains(r#""role":"user""#));
    }
}
