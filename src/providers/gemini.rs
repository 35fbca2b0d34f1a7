//! Native Gemini API client for embeddings and streamed generation

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::GenerationProvider;
use super::sse;

/// Gemini API client
///
/// One client serves both concerns: `embedContent` for embeddings and
/// `streamGenerateContent` (SSE) for answer generation.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: &GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config: config.clone(),
        }
    }

    fn embed_endpoint(&self) -> String {
        format!(
            "{}/models/{}:embedContent",
            self.config.base_url, self.config.embed_model
        )
    }

    fn stream_endpoint(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url, self.config.generate_model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    content: EmbedContent,
}

#[derive(Serialize)]
struct EmbedContent {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbedValues,
}

#[derive(Deserialize)]
struct EmbedValues {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Text carried by one streamed SSE line, if any.
///
/// The final chunk of a stream often carries finish metadata and no
/// content; such fragments contribute nothing to aggregation.
fn stream_fragment(line: &str) -> Option<String> {
    let payload = sse::data_payload(line)?;
    let chunk: StreamChunk = serde_json::from_str(payload).ok()?;
    let parts = chunk.candidates.into_iter().next()?.content?.parts?;
    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: format!("models/{}", self.config.embed_model),
            content: EmbedContent {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(self.embed_endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!("HTTP {}: {}", status, body)));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("failed to parse response: {}", e)))?;

        Ok(parsed.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(self.stream_endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation("gemini", format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(
                "gemini",
                format!("HTTP {}: {}", status, body),
            ));
        }

        let mut stream = response.bytes_stream();
        let mut lines = sse::LineBuffer::new();
        let mut answer = String::new();

        while let Some(chunk) = stream.next().await {
            let bytes =
                chunk.map_err(|e| Error::generation("gemini", format!("stream error: {}", e)))?;
            for line in lines.push(&bytes) {
                if let Some(fragment) = stream_fragment(&line) {
                    answer.push_str(&fragment);
                }
            }
        }

        if answer.is_empty() {
            return Err(Error::generation(
                "gemini",
                "stream ended without any content",
            ));
        }

        Ok(answer)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.generate_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_extracts_candidate_text() {
        let line = r#"data: {"candidates":[{"content":{"parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
        assert_eq!(stream_fragment(line), Some("Hello".to_string()));
    }

    #[test]
    fn content_less_chunks_are_skipped() {
        assert_eq!(
            stream_fragment(r#"data: {"candidates":[{"finishReason":"STOP"}]}"#),
            None
        );
        assert_eq!(
            stream_fragment(r#"data: {"candidates":[{"content":{"parts":[]}}]}"#),
            None
        );
        assert_eq!(stream_fragment(r#"data: {"candidates":[]}"#), None);
    }

    #[test]
    fn non_data_lines_are_skipped() {
        assert_eq!(stream_fragment(": keep-alive"), None);
        assert_eq!(stream_fragment(""), None);
    }
}
