//! Command-line arguments and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use askpdf_rag::gemini::DEFAULT_MODEL;
use askpdf_rag::{DEFAULT_COLLECTION, RagConfig};
use askpdf_telemetry::LogFormat;
use clap::Parser;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Ask questions about your PDF files
#[derive(Parser, Debug, Clone)]
#[command(name = "askpdf", version, about = "Ask questions about your PDF files")]
pub struct Cli {
    /// PDF files to upload at startup
    #[arg(value_name = "PDF")]
    pub files: Vec<PathBuf>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Fallback for --api-key
    #[arg(long, env = "GOOGLE_API_KEY", hide = true, hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Qdrant endpoint (gRPC)
    #[arg(long, env = "QDRANT_URL", default_value = DEFAULT_QDRANT_URL)]
    pub qdrant_url: String,

    /// Qdrant API key
    #[arg(long, env = "QDRANT_API_KEY", hide_env_values = true)]
    pub qdrant_api_key: Option<String>,

    /// Vector collection shared by all documents
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Gemini model used to write answers
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Passages retrieved per question
    #[arg(long, default_value_t = 3)]
    pub top_k: usize,

    /// Chunk length limit in characters
    #[arg(long, default_value_t = 500)]
    pub chunk_size: usize,

    /// Delay between revealed answer characters, in milliseconds
    #[arg(long, default_value_t = 10)]
    pub typing_delay_ms: u64,

    /// Keep a removed document's vectors in the collection
    #[arg(long)]
    pub keep_orphans: bool,

    /// Use a process-local vector store instead of Qdrant
    #[arg(long)]
    pub in_memory: bool,

    /// Log output format (text or json)
    #[arg(long, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// The Gemini API key, preferring `GEMINI_API_KEY` over `GOOGLE_API_KEY`.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .or(self.google_api_key.as_deref())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    /// Build and validate the pipeline configuration.
    pub fn rag_config(&self) -> askpdf_rag::Result<RagConfig> {
        RagConfig::builder()
            .collection(self.collection.clone())
            .top_k(self.top_k)
            .chunk_size(self.chunk_size)
            .purge_on_remove(!self.keep_orphans)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("askpdf").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_the_pipeline_defaults() {
        let cli = parse(&["--in-memory"]);
        let config = cli.rag_config().unwrap();
        let defaults = RagConfig::default();

        assert_eq!(config, defaults);
        assert_eq!(cli.model, DEFAULT_MODEL);
        assert_eq!(cli.typing_delay(), Duration::from_millis(10));
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "--collection",
            "mine",
            "--top-k",
            "5",
            "--chunk-size",
            "200",
            "--keep-orphans",
            "--log-format",
            "json",
            "a.pdf",
            "b.pdf",
        ]);
        let config = cli.rag_config().unwrap();

        assert_eq!(config.collection, "mine");
        assert_eq!(config.top_k, 5);
        assert_eq!(config.chunk_size, 200);
        assert!(!config.purge_on_remove);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.files, [PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
    }

    #[test]
    fn zero_top_k_is_rejected_by_config() {
        let cli = parse(&["--top-k", "0"]);
        assert!(cli.rag_config().is_err());
    }

    #[test]
    fn unknown_log_format_is_a_parse_error() {
        let result = Cli::try_parse_from(["askpdf", "--log-format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn api_key_prefers_gemini_over_google() {
        let mut cli = parse(&[]);
        cli.api_key = None;
        cli.google_api_key = Some("google".into());
        assert_eq!(cli.api_key(), Some("google"));

        cli.api_key = Some("gemini".into());
        assert_eq!(cli.api_key(), Some("gemini"));

        cli.api_key = Some("  ".into());
        cli.google_api_key = None;
        assert_eq!(cli.api_key(), None);
    }
}
