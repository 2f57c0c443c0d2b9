//! PDF Q&A server binary
//!
//! Run with: cargo run -p pdf-qa --bin pdf-qa-server
//!
//! Set PDF_QA_CONFIG to a TOML file to override the built-in defaults.

use pdf_qa::{config::AppConfig, server::PdfQaServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                  PDF Question Answering                   ║
║          Upload a PDF, ask questions about it             ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = match std::env::var("PDF_QA_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::load(&path)?
        }
        Err(_) => AppConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Backend: {:?}", config.qa.backend);
    tracing::info!("  - Model: {}", config.qa.model);
    tracing::info!("  - Min confidence: {}", config.qa.min_confidence);
    tracing::info!("  - Min context words: {}", config.qa.min_context_words);

    // Create and start server
    let server = PdfQaServer::new(config).await?;

    println!("\nServer starting...");
    println!("  Chat:     http://{}", server.address());
    println!("  Health:   http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
