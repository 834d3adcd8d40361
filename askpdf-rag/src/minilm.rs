//! Local sentence-embedding provider using the `fastembed` crate.
//!
//! This module is only available when the `fastembed` feature is enabled.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, error, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const PROVIDER: &str = "fastembed";

/// An [`EmbeddingProvider`] running `all-MiniLM-L6-v2` locally through ONNX Runtime.
///
/// Inference is CPU-bound, so every call runs on a blocking thread. The model
/// is shared behind a mutex because `fastembed` needs exclusive access while
/// embedding.
///
/// # Example
///
/// ```rust,ignore
/// use askpdf_rag::minilm::FastEmbedProvider;
///
/// let provider = FastEmbedProvider::new()?;
/// assert_eq!(provider.dimensions(), 384);
/// ```
pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    dimensions: usize,
}

impl FastEmbedProvider {
    /// Create a provider for `all-MiniLM-L6-v2` using fastembed's default cache directory.
    pub fn new() -> Result<Self> {
        Self::with_options(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
    }

    /// Create a provider that stores downloaded model files under `cache_dir`.
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_options(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_cache_dir(cache_dir.into()),
        )
    }

    /// Create a provider from explicit fastembed options.
    ///
    /// The output dimensionality is probed with a one-word embedding.
    pub fn with_options(options: InitOptions) -> Result<Self> {
        let mut model = TextEmbedding::try_new(options.with_show_download_progress(true))
            .map_err(|e| Self::map_err(format!("failed to initialize model: {e}")))?;

        let probe = model.embed(vec!["test"], None).map_err(|e| Self::map_err(e.to_string()))?;
        let dimensions = probe.first().map(Vec::len).ok_or_else(|| {
            Self::map_err("model returned no embedding for the probe input".to_string())
        })?;

        info!(provider = PROVIDER, dimensions, "embedding model ready");

        Ok(Self { model: Arc::new(Mutex::new(model)), dimensions })
    }

    fn map_err(message: String) -> RagError {
        RagError::EmbeddingError { provider: PROVIDER.to_string(), message }
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| Self::map_err("model returned no embedding".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = PROVIDER, batch_size = texts.len(), "embedding batch");

        let owned: Vec<String> = texts.iter().map(|t| (*t).to_string()).collect();
        let model = Arc::clone(&self.model);

        let embeddings = tokio::task::spawn_blocking(move || {
            let mut model =
                model.lock().map_err(|_| Self::map_err("model mutex poisoned".to_string()))?;
            model.embed(owned, None).map_err(|e| Self::map_err(e.to_string()))
        })
        .await
        .map_err(|e| {
            error!(provider = PROVIDER, error = %e, "embedding task failed");
            Self::map_err(format!("embedding task failed: {e}"))
        })??;

        if embeddings.len() != texts.len() {
            return Err(Self::map_err(format!(
                "expected {} embeddings, model returned {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
