//! PDF text extraction

use crate::error::{Error, Result};

/// Upper bound on a single extraction; some PDFs with pathological fonts
/// make pdf-extract spin for minutes.
const EXTRACT_TIMEOUT_SECS: u64 = 60;

/// Extract plain text from a PDF held in memory.
///
/// Empty output is not an error here; the ingestion path rejects
/// whitespace-only documents before any store mutation.
pub fn extract_text(data: &[u8]) -> Result<String> {
    let content = extract_with_timeout(data)?;

    // Strip null bytes and collapse blank/padded lines left by extraction
    let content = content
        .replace('\0', "")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(content)
}

/// Run pdf-extract on a watchdog thread so a hung extraction cannot stall
/// the request forever.
fn extract_with_timeout(data: &[u8]) -> Result<String> {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    let data_vec = data.to_vec();
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        let result = pdf_extract::extract_text_from_mem(&data_vec);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(Duration::from_secs(EXTRACT_TIMEOUT_SECS)) {
        Ok(Ok(text)) => {
            let _ = handle.join();
            Ok(text)
        }
        Ok(Err(e)) => {
            let _ = handle.join();
            tracing::warn!("pdf-extract failed: {}, trying lopdf fallback", e);
            extract_text_fallback(data)
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            // The thread cannot be killed; leave it and try the fallback
            tracing::error!(
                "PDF extraction timed out after {}s, trying lopdf fallback",
                EXTRACT_TIMEOUT_SECS
            );
            extract_text_fallback(data)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::error!("PDF extraction thread crashed, trying lopdf fallback");
            extract_text_fallback(data)
        }
    }
}

/// Fallback extraction using lopdf directly
fn extract_text_fallback(data: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| Error::extraction(format!("failed to load PDF: {}", e)))?;

    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages)
        .map_err(|e| Error::extraction(format!("failed to extract text: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pdf_bytes() {
        let result = extract_text(b"this is not a pdf document");
        assert!(matches!(result, Err(Error::Extraction(_))));
    }
}
