//! Error types for the chat service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Chat service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upload carried no usable file field
    #[error("No file uploaded. Please try again.")]
    MissingFile,

    /// Upload was not a PDF
    #[error("Invalid file type '{0}'. Only PDF files are allowed.")]
    InvalidFileType(String),

    /// Document contained no text after trimming
    #[error("No text extracted from the PDF.")]
    EmptyDocument,

    /// PDF text extraction failed
    #[error("Failed to extract text: {0}")]
    Extraction(String),

    /// Persisting the uploaded file failed
    #[error("File saving failed: {0}")]
    FileSave(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Document store write error
    #[error("Document store write failed: {0}")]
    StoreWrite(String),

    /// Generation backend error, tagged with the provider that failed
    #[error("Generation failed ({provider}): {message}")]
    Generation { provider: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a store write error
    pub fn store_write(message: impl Into<String>) -> Self {
        Self::StoreWrite(message.into())
    }

    /// Create a generation error carrying the provider name
    pub fn generation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::MissingFile => (StatusCode::BAD_REQUEST, "missing_file"),
            Error::InvalidFileType(_) => (StatusCode::BAD_REQUEST, "invalid_file_type"),
            Error::EmptyDocument => (StatusCode::BAD_REQUEST, "empty_document"),
            Error::Extraction(_) => (StatusCode::BAD_REQUEST, "extraction_error"),
            Error::FileSave(_) => (StatusCode::INTERNAL_SERVER_ERROR, "file_save_error"),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding_error"),
            Error::StoreWrite(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            Error::Generation { .. } => (StatusCode::BAD_GATEWAY, "generation_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
