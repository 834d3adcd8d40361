//! Process-local vector store.
//!
//! [`InMemoryVectorStore`] behaves like the Qdrant backend for a single
//! process: collections have a fixed dimensionality, records are keyed by
//! chunk id, and searches are scoped to one document and ranked by cosine
//! similarity. Used by `--in-memory` runs and tests.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "InMemory";

#[derive(Debug)]
struct Collection {
    dimensions: usize,
    records: HashMap<String, Chunk>,
}

/// A [`VectorStore`] holding every collection in memory.
///
/// # Example
///
/// ```rust,ignore
/// use askpdf_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.ensure_collection("session_docs", 384).await?;
/// store.upsert("session_docs", &chunks).await?;
/// let hits = store.search("session_docs", &query, &doc_id, 3).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `collection`, or `None` if it does not exist.
    pub async fn len(&self, collection: &str) -> Option<usize> {
        self.collections.read().await.get(collection).map(|c| c.records.len())
    }

    fn error(message: String) -> RagError {
        RagError::VectorStoreError { backend: BACKEND.to_string(), message }
    }

    fn missing(collection: &str) -> RagError {
        Self::error(format!("collection '{collection}' does not exist"))
    }
}

impl Collection {
    fn check_dimensions(&self, what: &str, len: usize) -> Result<()> {
        if len == self.dimensions {
            return Ok(());
        }
        Err(InMemoryVectorStore::error(format!(
            "{what} has {len} dimensions, collection expects {}",
            self.dimensions
        )))
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(d, na, nb), (x, y)| (d + x * y, na + x * x, nb + y * y));
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        if !collections.contains_key(name) {
            debug!(backend = BACKEND, collection = name, dimensions, "creating collection");
            collections
                .insert(name.to_string(), Collection { dimensions, records: HashMap::new() });
        }
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let target = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;

        // Validate the whole batch before writing any of it.
        for chunk in chunks {
            target.check_dimensions(&format!("chunk '{}'", chunk.id), chunk.embedding.len())?;
        }
        for chunk in chunks {
            target.records.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        document_id: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let target = collections.get(collection).ok_or_else(|| Self::missing(collection))?;
        target.check_dimensions("query", embedding.len())?;

        let mut hits: Vec<SearchResult> = target
            .records
            .values()
            .filter(|chunk| chunk.document_id == document_id)
            .map(|chunk| SearchResult {
                score: cosine_similarity(&chunk.embedding, embedding),
                chunk: chunk.clone(),
            })
            .collect();

        // Highest score first; ties broken by id so results are stable.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let target = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
        let before = target.records.len();
        target.records.retain(|_, chunk| chunk.document_id != document_id);
        debug!(
            backend = BACKEND,
            collection,
            document.id = document_id,
            removed = before - target.records.len(),
            "deleted document records"
        );
        Ok(())
    }
}
