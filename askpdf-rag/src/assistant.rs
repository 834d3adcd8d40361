//! Request handlers for a document question-answering session.
//!
//! [`PdfAssistant`] owns the service clients; every user action is one async
//! method taking the caller's [`Session`] explicitly:
//!
//! | Action | Method |
//! |--------|--------|
//! | upload files | [`upload`](PdfAssistant::upload) / [`upload_file`](PdfAssistant::upload_file) |
//! | reconcile with the current upload set | [`sync`](PdfAssistant::sync) |
//! | drop one file | [`remove`](PdfAssistant::remove) |
//! | ask a question | [`ask`](PdfAssistant::ask) |
//! | view / clear history | [`history`](PdfAssistant::history) / [`clear_history`](PdfAssistant::clear_history) |

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::document::{Answer, Document, DocumentEntry, HistoryEntry};
use crate::error::{RagError, Result};
use crate::extract::TextExtractor;
use crate::pipeline::RagPipeline;
use crate::session::Session;
use crate::synthesis::{GenerationParams, Synthesizer, TextGenerator};

/// A file handed to [`PdfAssistant::upload`].
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name; the de-duplication key within a session.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }
}

/// What happened to one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The file was extracted, indexed and registered.
    Indexed(DocumentEntry),
    /// A document with the same file name is already active.
    Skipped { file_name: String },
}

pub struct PdfAssistant {
    extractor: Arc<dyn TextExtractor>,
    pipeline: RagPipeline,
    synthesizer: Synthesizer,
}

impl PdfAssistant {
    /// Assemble an assistant. Generation parameters come from the pipeline config.
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        pipeline: RagPipeline,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let params = GenerationParams::from(pipeline.config());
        Self { extractor, pipeline, synthesizer: Synthesizer::new(generator, params) }
    }

    pub fn pipeline(&self) -> &RagPipeline {
        &self.pipeline
    }

    /// Upload files in order, stopping at the first failure.
    ///
    /// Files registered before the failure stay registered; the failing file
    /// leaves no trace in the session.
    pub async fn upload(
        &self,
        session: &mut Session,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<UploadOutcome>> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            outcomes.push(self.upload_file(session, file).await?);
        }
        Ok(outcomes)
    }

    /// Extract, chunk, embed and index one file, then register it.
    ///
    /// The session is only modified once every step has succeeded.
    pub async fn upload_file(
        &self,
        session: &mut Session,
        file: UploadedFile,
    ) -> Result<UploadOutcome> {
        if session.contains_file(&file.name) {
            info!(file_name = %file.name, "file already uploaded, skipping");
            return Ok(UploadOutcome::Skipped { file_name: file.name });
        }

        let UploadedFile { name, bytes } = file;
        let text = self.extract(&name, bytes).await?;
        let document = Document::new(name, text);
        let chunks = self.pipeline.ingest(&document).await?;

        let entry = DocumentEntry {
            id: document.id,
            file_name: document.file_name,
            chunk_count: chunks.len(),
        };
        info!(document.id = %entry.id, file_name = %entry.file_name, chunk_count = entry.chunk_count, "registered document");
        session.register(entry.clone());

        Ok(UploadOutcome::Indexed(entry))
    }

    /// Make the session's documents match `active_names` exactly.
    ///
    /// Documents whose file is gone are pruned with their histories and
    /// returned. When `purge_on_remove` is set their index records are deleted
    /// as well. A failed deletion does not fail the sync: the entry is parked in
    /// [`Session::pending_purge`] and retried by every later sync.
    pub async fn sync<S: AsRef<str>>(
        &self,
        session: &mut Session,
        active_names: &[S],
    ) -> Result<Vec<DocumentEntry>> {
        let pruned = session.retain_files(active_names);
        if !pruned.is_empty() {
            info!(count = pruned.len(), "pruned inactive documents");
        }

        if self.pipeline.config().purge_on_remove {
            let mut purge = session.take_pending_purge();
            purge.extend(pruned.iter().cloned());

            for entry in purge {
                if let Err(e) = self.pipeline.delete_document(&entry.id).await {
                    warn!(document.id = %entry.id, error = %e, "index records not deleted, will retry");
                    session.defer_purge(entry);
                }
            }
        }

        Ok(pruned)
    }

    /// Prune a single file from the session. Returns `None` if it was not active.
    pub async fn remove(
        &self,
        session: &mut Session,
        file_name: &str,
    ) -> Result<Option<DocumentEntry>> {
        let remaining: Vec<String> = session
            .documents()
            .iter()
            .filter(|d| d.file_name != file_name)
            .map(|d| d.file_name.clone())
            .collect();

        Ok(self.sync(session, &remaining).await?.into_iter().next())
    }

    /// Answer a question about one document and append it to that document's history.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyQuestion`] for blank input
    /// - [`RagError::UnknownDocument`] if the document is not active
    /// - the embedding, vector store or generation error that aborted the request
    pub async fn ask(
        &self,
        session: &mut Session,
        document_id: &str,
        question: &str,
    ) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(RagError::EmptyQuestion);
        }
        if session.document(document_id).is_none() {
            return Err(RagError::UnknownDocument(document_id.to_string()));
        }

        let sources = self.pipeline.query(document_id, question).await?;
        let text = self.synthesizer.synthesize(question, &sources).await?;

        session.record(
            document_id,
            HistoryEntry {
                question: question.to_string(),
                answer: text.clone(),
                asked_at: Utc::now(),
            },
        )?;

        Ok(Answer { text, sources })
    }

    /// The chat history of a document, oldest first.
    pub fn history<'s>(&self, session: &'s Session, document_id: &str) -> Result<&'s [HistoryEntry]> {
        session.history(document_id)
    }

    /// Empty one document's history.
    pub fn clear_history(&self, session: &mut Session, document_id: &str) -> Result<()> {
        session.clear_history(document_id)?;
        info!(document.id = document_id, "cleared history");
        Ok(())
    }

    async fn extract(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let extractor = Arc::clone(&self.extractor);
        let name = file_name.to_string();

        // Parsers can panic on malformed input; the join error contains it.
        tokio::task::spawn_blocking(move || extractor.extract(&name, &bytes)).await.map_err(|e| {
            RagError::ExtractionError {
                file_name: file_name.to_string(),
                message: format!("extraction task failed: {e}"),
            }
        })?
    }
}
