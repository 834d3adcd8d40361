use std::sync::Arc;

use anyhow::{Context, Result};
use askpdf_cli::{Cli, Console};
use askpdf_rag::{
    FastEmbedProvider, GeminiGenerator, InMemoryVectorStore, PdfAssistant, PdfExtractor,
    QdrantVectorStore, RagPipeline, VectorStore,
};
use askpdf_telemetry::{TelemetryConfig, init_telemetry};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (GEMINI_API_KEY, QDRANT_URL, ...).
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_telemetry(
        &TelemetryConfig::new("askpdf")
            .with_format(cli.log_format)
            .with_default_filter("warn,askpdf=info,askpdf_rag=info"),
    )?;

    let config = cli.rag_config()?;

    let api_key = cli.api_key().context(
        "GEMINI_API_KEY (or GOOGLE_API_KEY) must be set.\n\
         Get a key at https://aistudio.google.com/apikey",
    )?;
    let generator = GeminiGenerator::new(api_key)?.with_model(&cli.model);

    let vector_store: Arc<dyn VectorStore> = if cli.in_memory {
        info!("using in-memory vector store");
        Arc::new(InMemoryVectorStore::new())
    } else {
        info!(url = %cli.qdrant_url, collection = %config.collection, "using qdrant");
        Arc::new(QdrantVectorStore::new(&cli.qdrant_url, cli.qdrant_api_key.clone())?)
    };

    // The first run downloads the model.
    let embedder = tokio::task::spawn_blocking(FastEmbedProvider::new)
        .await
        .context("embedding model initialization panicked")??;

    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(embedder))
        .vector_store(vector_store)
        .build()?;
    pipeline.ensure_collection().await?;

    let assistant = PdfAssistant::new(Arc::new(PdfExtractor), pipeline, Arc::new(generator));
    let mut console = Console::new(assistant, cli.typing_delay());

    if !cli.files.is_empty() {
        let mut stdout = std::io::stdout();
        if let Err(e) = console.upload(&cli.files, &mut stdout).await {
            eprintln!("Error: {e:#}");
        }
    }

    console.run().await
}
