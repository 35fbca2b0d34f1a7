//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use std::path::Path;

use crate::error::{Error, Result};
use crate::ingestion::extract_text;
use crate::server::state::AppState;
use crate::types::chat::UploadResponse;

/// POST /upload - Upload a PDF and replace the resident corpus
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    if !is_pdf_filename(&filename) {
        return Err(Error::InvalidFileType(filename));
    }

    tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());

    // Persist the raw upload under its original name; a same-named
    // re-upload overwrites the previous file.
    let path = state.config().storage.upload_dir.join(&filename);
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| Error::FileSave(e.to_string()))?;

    // pdf-extract is CPU-bound, keep it off the async workers
    let text = tokio::task::spawn_blocking(move || extract_text(&data))
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

    state.retriever().ingest(&text).await?;

    tracing::info!("Stored document from '{}'", filename);

    Ok(Json(UploadResponse {
        message: format!("PDF '{}' successfully processed and stored.", filename),
    }))
}

/// Pull the `file` field out of the multipart body.
///
/// Any path components the client sends are stripped before the name is
/// used on disk.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::internal(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .and_then(|name| Path::new(name).file_name())
            .and_then(|name| name.to_str())
            .map(|name| name.to_string())
            .ok_or(Error::MissingFile)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::internal(format!("Failed to read file: {}", e)))?;

        return Ok((filename, data));
    }

    Err(Error::MissingFile)
}

/// MIME check by filename, matching the upload contract
fn is_pdf_filename(filename: &str) -> bool {
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str() == "application/pdf")
        .unwrap_or(false)
}
