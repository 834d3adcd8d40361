//! # askpdf-rag
//!
//! Question answering over uploaded PDF files.
//!
//! ## Overview
//!
//! Uploaded files go through extract → chunk → embed → upsert into one shared
//! vector collection, every chunk tagged with the id of its document. A
//! question is embedded, matched against the chunks of one selected document
//! only, and answered by an LLM from the retrieved passages. Each document
//! keeps its own chat history inside a caller-owned [`Session`].
//!
//! - [`PdfAssistant`] - request handlers (upload, sync, remove, ask, history)
//! - [`RagPipeline`] - chunking, embedding and vector search
//! - [`Synthesizer`] - prompt construction and answer generation
//! - [`Session`] - active documents, selection and per-document history
//!
//! ## Features
//!
//! | Feature | Provides |
//! |---------|----------|
//! | `gemini` | [`GeminiGenerator`] |
//! | `qdrant` | [`QdrantVectorStore`] |
//! | `fastembed` | [`FastEmbedProvider`] (all-MiniLM-L6-v2, 384 dims) |
//! | `pdf` | [`PdfExtractor`] |
//! | `full` | all of the above |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use askpdf_rag::*;
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(FastEmbedProvider::new()?))
//!     .vector_store(Arc::new(QdrantVectorStore::new("http://localhost:6334", None)?))
//!     .build()?;
//! let assistant = PdfAssistant::new(
//!     Arc::new(PdfExtractor),
//!     pipeline,
//!     Arc::new(GeminiGenerator::from_env()?),
//! );
//!
//! let mut session = Session::new();
//! assistant.upload(&mut session, vec![UploadedFile::new("cats.pdf", bytes)]).await?;
//! let doc_id = session.selected().map(|d| d.id.clone()).unwrap_or_default();
//! let answer = assistant.ask(&mut session, &doc_id, "What do cats eat?").await?;
//! println!("{}", answer.text);
//! ```

pub mod assistant;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod inmemory;
pub mod pipeline;
pub mod session;
pub mod synthesis;
pub mod vectorstore;

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "fastembed")]
pub mod minilm;
#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use assistant::{PdfAssistant, UploadOutcome, UploadedFile};
pub use chunking::{Chunker, SentenceChunker, split_sentences};
pub use config::{DEFAULT_COLLECTION, RagConfig, RagConfigBuilder};
pub use document::{Answer, Chunk, Document, DocumentEntry, HistoryEntry, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use extract::TextExtractor;
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use session::Session;
pub use synthesis::{GenerationParams, Synthesizer, TextGenerator, build_prompt};
pub use vectorstore::VectorStore;

#[cfg(feature = "pdf")]
pub use extract::PdfExtractor;
#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;
#[cfg(feature = "fastembed")]
pub use minilm::FastEmbedProvider;
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
