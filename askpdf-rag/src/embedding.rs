//! Sentence embeddings for chunks and questions.

use async_trait::async_trait;

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// Turns text into fixed-length vectors.
///
/// Every vector a provider returns has [`dimensions`](Self::dimensions)
/// components, and the same text always maps to the same vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text, typically a question.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts in one call, returning vectors in input order.
    ///
    /// Falls back to one [`embed`](Self::embed) call per text.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Length of every vector this provider produces.
    fn dimensions(&self) -> usize;
}

/// Embed all `chunks` in one batch and attach the vectors.
///
/// Chunks are left untouched unless the provider returned exactly one vector
/// of the right length per chunk.
pub async fn embed_chunks(provider: &dyn EmbeddingProvider, chunks: &mut [Chunk]) -> Result<()> {
    if chunks.is_empty() {
        return Ok(());
    }

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    let embeddings = provider.embed_batch(&texts).await?;

    if embeddings.len() != chunks.len() {
        return Err(mismatch(format!(
            "expected {} embeddings, got {}",
            chunks.len(),
            embeddings.len()
        )));
    }
    check_dimensions(provider, &embeddings)?;

    for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
        chunk.embedding = embedding;
    }
    Ok(())
}

/// Embed a question, checking the vector length.
pub async fn embed_query(provider: &dyn EmbeddingProvider, question: &str) -> Result<Vec<f32>> {
    let embedding = provider.embed(question).await?;
    check_dimensions(provider, std::slice::from_ref(&embedding))?;
    Ok(embedding)
}

fn check_dimensions(provider: &dyn EmbeddingProvider, embeddings: &[Vec<f32>]) -> Result<()> {
    let expected = provider.dimensions();
    match embeddings.iter().find(|e| e.len() != expected) {
        Some(bad) => Err(mismatch(format!(
            "embedding has {} dimensions, provider reports {expected}",
            bad.len()
        ))),
        None => Ok(()),
    }
}

fn mismatch(message: String) -> RagError {
    RagError::EmbeddingError { provider: "pipeline".into(), message }
}
