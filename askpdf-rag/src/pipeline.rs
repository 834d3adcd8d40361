//! Retrieval pipeline.
//!
//! The [`RagPipeline`] coordinates the ingest-and-query workflow by
//! composing an [`EmbeddingProvider`], a [`VectorStore`] and a [`Chunker`]
//! around the single collection named in [`RagConfig::collection`].
//!
//! # Example
//!
//! ```rust,ignore
//! use askpdf_rag::{RagPipeline, RagConfig, InMemoryVectorStore, SentenceChunker};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! let chunks = pipeline.ingest(&document).await?;
//! let results = pipeline.query(&document.id, "What are cats?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, SentenceChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::{EmbeddingProvider, embed_chunks, embed_query};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The retrieval pipeline.
///
/// Ingestion runs chunk → embed → ensure collection → upsert; queries run
/// embed → document-filtered search. Errors keep the kind of the service
/// that failed. Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Create the configured collection if it does not exist.
    ///
    /// The collection is created with the dimensionality reported by the
    /// configured [`EmbeddingProvider`].
    pub async fn ensure_collection(&self) -> Result<()> {
        let collection = self.config.collection.as_str();
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.ensure_collection(collection, dimensions).await.map_err(|e| {
            error!(collection, error = %e, "failed to ensure collection");
            e
        })
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// Returns the chunks that were stored (with embeddings attached). Nothing
    /// is written to the index unless every chunk was embedded. The collection
    /// is ensured even for documents without text so later searches succeed.
    pub async fn ingest(&self, document: &Document) -> Result<Vec<Chunk>> {
        // 1. Chunk the document
        let mut chunks = self.chunker.chunk(document);

        // 2. Embed all chunk texts in one batch
        embed_chunks(self.embedding_provider.as_ref(), &mut chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
            e
        })?;

        // 3. Make sure the shared collection exists
        self.ensure_collection().await?;

        // 4. Upsert into vector store
        self.vector_store.upsert(&self.config.collection, &chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
            e
        })?;

        info!(
            document.id = %document.id,
            file_name = %document.file_name,
            chunk_count = chunks.len(),
            "ingested document"
        );

        Ok(chunks)
    }

    /// Query one document: embed the question, then search that document's chunks.
    ///
    /// Returns at most `top_k` results ordered by descending similarity.
    pub async fn query(&self, document_id: &str, question: &str) -> Result<Vec<SearchResult>> {
        // 1. Embed the question
        let provider = self.embedding_provider.as_ref();
        let query_embedding = embed_query(provider, question).await.map_err(|e| {
            error!(document.id = document_id, error = %e, "embedding failed during query");
            e
        })?;

        // 2. Search the vector store, scoped to the document
        let collection = self.config.collection.as_str();
        let results = self
            .vector_store
            .search(collection, &query_embedding, document_id, self.config.top_k)
            .await
            .map_err(|e| {
                error!(collection, document.id = document_id, error = %e, "vector store search failed");
                e
            })?;

        info!(document.id = document_id, result_count = results.len(), "query completed");

        Ok(results)
    }

    /// Delete every index record of a document.
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        let collection = self.config.collection.as_str();
        self.vector_store.delete_document(collection, document_id).await.map_err(|e| {
            error!(collection, document.id = document_id, error = %e, "failed to delete document");
            e
        })?;
        info!(document.id = document_id, "deleted document from index");
        Ok(())
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedding provider and vector store are required. The chunker
/// defaults to a [`SentenceChunker`] using `config.chunk_size`, and the
/// config defaults to [`RagConfig::default()`].
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = RagPipeline::builder()
///     .config(RagConfig::default())
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(store))
///     .build()?;
/// ```
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Override the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(SentenceChunker::new(config.chunk_size)));

        Ok(RagPipeline { config, embedding_provider, vector_store, chunker })
    }
}
