//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`SentenceChunker`], a
//! greedy splitter that packs `". "`-delimited sentences into chunks below a
//! character limit.

use crate::document::{Chunk, Document};

/// The literal sentence delimiter.
pub const SENTENCE_DELIMITER: &str = ". ";

const DELIMITER_LEN: usize = SENTENCE_DELIMITER.len();

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and ownership fields but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no usable text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Packs sentences into chunks shorter than `chunk_size` characters.
///
/// Sentences are never split, so a single sentence at or above the limit
/// becomes its own oversized chunk. Chunks do not overlap.
///
/// # Example
///
/// ```rust,ignore
/// use askpdf_rag::SentenceChunker;
///
/// let chunker = SentenceChunker::new(500);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    chunk_size: usize,
}

impl SentenceChunker {
    /// Create a new `SentenceChunker` with a limit in characters.
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// The character limit.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(500)
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        split_sentences(&document.text, self.chunk_size)
            .into_iter()
            .map(|text| Chunk {
                id: uuid::Uuid::new_v4().to_string(),
                text,
                embedding: Vec::new(),
                document_id: document.id.clone(),
                file_name: document.file_name.clone(),
            })
            .collect()
    }
}

/// Split `text` on [`SENTENCE_DELIMITER`] and greedily pack the pieces.
///
/// A piece joins the current chunk only while the joined length stays below
/// `limit` characters. A chunk closed before the end of the text keeps the
/// period of the delimiter that followed it. Every chunk is trimmed and
/// blank chunks are dropped.
pub fn split_sentences(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    // (buffer, buffer length in chars)
    let mut pending: Option<(String, usize)> = None;

    for unit in text.split(SENTENCE_DELIMITER) {
        let unit_len = unit.chars().count();

        if let Some((buffer, len)) = pending.as_mut() {
            if *len + DELIMITER_LEN + unit_len < limit {
                buffer.push_str(SENTENCE_DELIMITER);
                buffer.push_str(unit);
                *len += DELIMITER_LEN + unit_len;
                continue;
            }
        }

        if let Some((mut closed, _)) = pending.replace((unit.to_string(), unit_len)) {
            if !closed.trim().is_empty() {
                closed.push('.');
            }
            push_trimmed(&mut chunks, &closed);
        }
    }

    if let Some((rest, _)) = pending {
        push_trimmed(&mut chunks, &rest);
    }

    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
