//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for vector embeddings with document-scoped similarity search.
///
/// Implementations manage named collections of [`Chunk`]s. Every chunk carries
/// the id of the document it came from, and searches are always restricted to
/// a single document.
///
/// # Example
///
/// ```rust,ignore
/// use askpdf_rag::{VectorStore, InMemoryVectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.ensure_collection("session_docs", 384).await?;
/// store.upsert("session_docs", &chunks).await?;
/// let results = store.search("session_docs", &query_embedding, &doc_id, 3).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection with cosine distance if it does not exist yet.
    ///
    /// Must never drop or recreate an existing collection, and must succeed
    /// when another client creates the same collection concurrently.
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Upsert chunks into a collection. Chunks must have embeddings set.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Search for the `top_k` chunks of `document_id` most similar to `embedding`.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        document_id: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Delete every chunk tagged with `document_id`.
    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<()>;
}
