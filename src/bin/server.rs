//! Chat server binary
//!
//! Run with: cargo run --bin docchat-server

use docchat::{server::ChatServer, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Generation model: {}", config.gemini.generate_model);
    tracing::info!("  - Embedding model: {}", config.gemini.embed_model);
    tracing::info!("  - Retrieval top-k: {}", config.retrieval.top_k);
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());

    if config.gemini.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; embedding and Gemini generation will fail");
    }
    if config.openrouter.deepseek_api_key.is_empty() {
        tracing::warn!("DEEPSEEK_API_KEY is not set; the Deepseek backend will fail");
    }
    if config.openrouter.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; the OpenAI backend will fail");
    }

    let server = ChatServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("\nEndpoints:");
    println!("  GET  /        - Liveness probe");
    println!("  POST /upload  - Upload a PDF (replaces the resident document)");
    println!("  POST /chat    - Ask questions about the document");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
