//! Configuration for the chat service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Gemini configuration (embeddings + native generation)
    pub gemini: GeminiConfig,
    /// OpenRouter gateway configuration (Deepseek and OpenAI model families)
    pub openrouter: OpenRouterConfig,
}

impl Config {
    /// Load configuration: an optional TOML file (`DOCCHAT_CONFIG`, falling
    /// back to `docchat.toml` in the working directory), then environment
    /// overrides for the provider credentials.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("DOCCHAT_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let default_path = Path::new("docchat.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Overlay provider credentials from the environment
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Ok(key) = std::env::var("DEEPSEEK_API_KEY") {
            self.openrouter.deepseek_api_key = key;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openrouter.openai_api_key = key;
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Storage layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for raw uploaded files, kept under their original names
    pub upload_dir: PathBuf,
    /// Directory for the durable corpus snapshot
    pub index_dir: PathBuf,
}

impl StorageConfig {
    /// Path of the corpus snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.index_dir.join("corpus.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            index_dir: PathBuf::from("index"),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of passages returned per query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API base URL
    pub base_url: String,
    /// API key (usually supplied via `GEMINI_API_KEY`)
    pub api_key: String,
    /// Generation model name
    pub generate_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds, covering the full streamed response
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            generate_model: "gemini-1.5-flash".to_string(),
            embed_model: "embedding-001".to_string(),
            dimensions: 768,
            temperature: 0.5,
            timeout_secs: 120,
        }
    }
}

/// OpenRouter gateway configuration
///
/// Both the Deepseek and OpenAI backends talk to the same gateway with
/// their own credentials and model identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// Gateway base URL
    pub base_url: String,
    /// API key for the Deepseek backend (usually `DEEPSEEK_API_KEY`)
    pub deepseek_api_key: String,
    /// API key for the OpenAI backend (usually `OPENAI_API_KEY`)
    pub openai_api_key: String,
    /// Deepseek model identifier
    pub deepseek_model: String,
    /// OpenAI model identifier
    pub openai_model: String,
    /// Request timeout in seconds, covering the full streamed response
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            deepseek_api_key: String::new(),
            openai_api_key: String::new(),
            deepseek_model: "deepseek/deepseek-r1-distill-llama-70b:free".to_string(),
            openai_model: "openai/o3-mini-high".to_string(),
            timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.retrieval.top_k, 10);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.gemini.generate_model, "gemini-1.5-flash");
        assert_eq!(config.gemini.embed_model, "embedding-001");
        assert!(config.openrouter.deepseek_model.starts_with("deepseek/"));
    }

    #[test]
    fn partial_toml_overlays_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9090

            [gemini]
            temperature = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.gemini.temperature, 0.2);
        // untouched sections keep their defaults
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.retrieval.top_k, 10);
        assert_eq!(config.storage.snapshot_path(), PathBuf::from("index/corpus.json"));
    }
}
