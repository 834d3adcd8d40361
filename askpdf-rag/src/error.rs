//! Error types for the `askpdf-rag` crate.

use thiserror::Error;

/// Errors that can occur while ingesting documents or answering questions.
///
/// Each external service gets its own variant so callers can tell which
/// step of an action failed.
#[derive(Debug, Error)]
pub enum RagError {
    /// Text could not be extracted from an uploaded file.
    #[error("Extraction error ({file_name}): {message}")]
    ExtractionError {
        /// The file being extracted.
        file_name: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The generative model failed to produce an answer.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The document id is not active in the session.
    #[error("Unknown document: {0}")]
    UnknownDocument(String),

    /// A question was empty or whitespace-only.
    #[error("Question must not be empty")]
    EmptyQuestion,
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
