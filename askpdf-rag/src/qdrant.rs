//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`] which implements [`VectorStore`] using
//! the [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC.
//!
//! Each chunk becomes one point whose payload is
//! `{"text": ..., "doc_id": ..., "file_name": ...}`.
//!
//! # Example
//!
//! ```rust,ignore
//! use askpdf_rag::qdrant::QdrantVectorStore;
//!
//! let store = QdrantVectorStore::new("http://localhost:6334", None)?;
//! store.ensure_collection("session_docs", 384).await?;
//! store.upsert("session_docs", &chunks).await?;
//! let results = store.search("session_docs", &query_embedding, &doc_id, 3).await?;
//! ```

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    ScoredPoint, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::{debug, warn};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const TEXT_KEY: &str = "text";
const DOC_ID_KEY: &str = "doc_id";
const FILE_NAME_KEY: &str = "file_name";

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Wraps a [`qdrant_client::Qdrant`] client and maps collections to Qdrant
/// collections with cosine distance.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Create a new Qdrant vector store connecting to `url`, optionally with an API key.
    pub fn new(url: &str, api_key: Option<String>) -> Result<Self> {
        let client = Qdrant::from_url(url).api_key(api_key).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Create a new Qdrant vector store with default URL (`http://localhost:6334`).
    pub fn default_url() -> Result<Self> {
        Self::new("http://localhost:6334", None)
    }

    /// Create a new Qdrant vector store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::VectorStoreError { backend: "qdrant".to_string(), message: e.to_string() }
    }

    fn document_filter(document_id: &str) -> Filter {
        Filter::must([Condition::matches(DOC_ID_KEY, document_id.to_string())])
    }

    /// Extract a string from a Qdrant payload value.
    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn to_point(chunk: &Chunk) -> PointStruct {
        let mut payload = Payload::new();
        payload.insert(TEXT_KEY, chunk.text.clone());
        payload.insert(DOC_ID_KEY, chunk.document_id.clone());
        payload.insert(FILE_NAME_KEY, chunk.file_name.clone());
        PointStruct::new(chunk.id.clone(), chunk.embedding.clone(), payload)
    }

    fn to_result(scored: ScoredPoint) -> SearchResult {
        let id = scored
            .id
            .as_ref()
            .and_then(|pid| match &pid.point_id_options {
                Some(PointIdOptions::Uuid(s)) => Some(s.clone()),
                Some(PointIdOptions::Num(n)) => Some(n.to_string()),
                None => None,
            })
            .unwrap_or_default();

        let field = |key: &str| scored.payload.get(key).and_then(Self::extract_string);

        SearchResult {
            chunk: Chunk {
                id,
                text: field(TEXT_KEY).unwrap_or_default(),
                embedding: vec![],
                document_id: field(DOC_ID_KEY).unwrap_or_default(),
                file_name: field(FILE_NAME_KEY).unwrap_or_default(),
            },
            score: scored.score,
        }
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if self.client.collection_exists(name).await.map_err(Self::map_err)? {
            debug!(collection = name, "qdrant collection already exists, skipping creation");
            return Ok(());
        }

        let created = self
            .client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await;

        match created {
            Ok(_) => {
                debug!(collection = name, dimensions, "created qdrant collection");
                Ok(())
            }
            // Another session may have created it between the check and the create.
            Err(e) => {
                if self.client.collection_exists(name).await.map_err(Self::map_err)? {
                    warn!(collection = name, error = %e, "collection created concurrently");
                    Ok(())
                } else {
                    Err(Self::map_err(e))
                }
            }
        }
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = chunks.iter().map(Self::to_point).collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count = chunks.len(), "upserted chunks to qdrant");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        document_id: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, embedding.to_vec(), top_k as u64)
                    .filter(Self::document_filter(document_id))
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        Ok(response.result.into_iter().map(Self::to_result).collect())
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<()> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(collection)
                    .points(Self::document_filter(document_id))
                    .wait(true),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection, document.id = document_id, "deleted document points from qdrant");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_payload_survives_point_conversion() {
        let chunk = Chunk {
            id: "6f1c0c53-4d2f-4b8e-9a55-0f4f1f0b9c11".into(),
            text: "Cats are mammals.".into(),
            embedding: vec![0.1, 0.2, 0.3],
            document_id: "doc-1".into(),
            file_name: "cats.pdf".into(),
        };

        let point = QdrantVectorStore::to_point(&chunk);
        assert_eq!(point.payload.len(), 3);

        let scored = ScoredPoint {
            id: point.id,
            payload: point.payload,
            score: 0.75,
            ..Default::default()
        };
        let result = QdrantVectorStore::to_result(scored);

        assert_eq!(result.score, 0.75);
        assert_eq!(result.chunk.id, chunk.id);
        assert_eq!(result.chunk.text, chunk.text);
        assert_eq!(result.chunk.document_id, "doc-1");
        assert_eq!(result.chunk.file_name, "cats.pdf");
        assert!(result.chunk.embedding.is_empty());
    }
}
