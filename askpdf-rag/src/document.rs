//! Data types for documents, chunks, search results and chat history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded file after text extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The uploaded file name, also the display name.
    pub file_name: String,
    /// The extracted text content.
    pub text: String,
}

impl Document {
    /// Create a document with a freshly generated id.
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: uuid::Uuid::new_v4().to_string(), file_name: file_name.into(), text: text.into() }
    }
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk (a UUID, usable as a Qdrant point id).
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
    /// The file the chunk was extracted from.
    pub file_name: String,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// A document registered in a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentEntry {
    /// The document id chunks were tagged with.
    pub id: String,
    /// The uploaded file name.
    pub file_name: String,
    /// Number of chunks written to the index.
    pub chunk_count: usize,
}

/// One answered question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// The question as the user typed it.
    pub question: String,
    /// The trimmed answer returned to the user.
    pub answer: String,
    /// When the answer was recorded.
    pub asked_at: DateTime<Utc>,
}

/// The result of [`PdfAssistant::ask`](crate::PdfAssistant::ask).
#[derive(Debug, Clone)]
pub struct Answer {
    /// The trimmed answer text.
    pub text: String,
    /// Retrieved passages in the order they were given to the model.
    pub sources: Vec<SearchResult>,
}
