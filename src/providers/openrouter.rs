//! OpenAI-compatible SSE chat-completions client
//!
//! The Deepseek and OpenAI model families share one upstream gateway;
//! a client instance carries the credential and model for its family.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OpenRouterConfig;
use crate::error::{Error, Result};

use super::llm::GenerationProvider;
use super::sse;

/// OpenRouter gateway client for one model family
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    provider_name: &'static str,
}

impl OpenRouterClient {
    /// Client for the Deepseek model family
    pub fn deepseek(config: &OpenRouterConfig) -> Self {
        Self::build(
            config,
            config.deepseek_api_key.clone(),
            config.deepseek_model.clone(),
            "deepseek",
        )
    }

    /// Client for the OpenAI model family
    pub fn openai(config: &OpenRouterConfig) -> Self {
        Self::build(
            config,
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            "openai",
        )
    }

    fn build(
        config: &OpenRouterConfig,
        api_key: String,
        model: String,
        provider_name: &'static str,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            model,
            provider_name,
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Incremental content carried by one SSE line, if any.
///
/// Role-only deltas, the trailing usage chunk, and the `[DONE]` sentinel
/// all carry no content; they contribute nothing to aggregation instead of
/// failing it.
fn delta_content(line: &str) -> Option<String> {
    let payload = sse::data_payload(line)?;
    if payload == "[DONE]" {
        return None;
    }
    let chunk: StreamChunk = serde_json::from_str(payload).ok()?;
    chunk.choices.into_iter().next()?.delta.content
}

#[async_trait]
impl GenerationProvider for OpenRouterClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: true,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                Error::generation(self.provider_name, format!("request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(
                self.provider_name,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let mut stream = response.bytes_stream();
        let mut lines = sse::LineBuffer::new();
        let mut answer = String::new();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| {
                Error::generation(self.provider_name, format!("stream error: {}", e))
            })?;
            for line in lines.push(&bytes) {
                if let Some(fragment) = delta_content(&line) {
                    answer.push_str(&fragment);
                }
            }
        }

        if answer.is_empty() {
            return Err(Error::generation(
                self.provider_name,
                "stream ended without any content",
            ));
        }

        Ok(answer)
    }

    fn name(&self) -> &str {
        self.provider_name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_extracts_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#;
        assert_eq!(delta_content(line), Some("Hel".to_string()));
    }

    #[test]
    fn content_less_fragments_are_skipped() {
        // explicit null content
        assert_eq!(
            delta_content(r#"data: {"choices":[{"delta":{"content":null}}]}"#),
            None
        );
        // role-only delta
        assert_eq!(
            delta_content(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
        // trailing usage chunk without choices
        assert_eq!(
            delta_content(r#"data: {"usage":{"total_tokens":42}}"#),
            None
        );
    }

    #[test]
    fn done_sentinel_and_comments_are_skipped() {
        assert_eq!(delta_content("data: [DONE]"), None);
        assert_eq!(delta_content(": OPENROUTER PROCESSING"), None);
    }

    #[test]
    fn fragments_aggregate_in_arrival_order() {
        let lines = [
            r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#,
            r#"data: {"choices":[{"delta":{"content":"lo"}}]}"#,
            r#"data: {"choices":[{"delta":{"content":null}}]}"#,
            r#"data: {"choices":[{"delta":{"content":" world"}}]}"#,
            "data: [DONE]",
        ];

        let answer: String = lines.iter().filter_map(|l| delta_content(l)).collect();
        assert_eq!(answer, "Hello world");
    }
}
