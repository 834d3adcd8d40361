//! Per-user session state.
//!
//! A [`Session`] is created when a user starts working, passed explicitly to
//! every [`PdfAssistant`](crate::PdfAssistant) handler, and dropped when the
//! user is done. It owns the list of active documents, one chat history per
//! document and the currently selected document. Pruned documents whose index
//! records could not be deleted are parked until the next sync retries them.

use std::collections::{HashMap, HashSet};

use crate::document::{DocumentEntry, HistoryEntry};
use crate::error::{RagError, Result};

#[derive(Debug, Default, Clone)]
pub struct Session {
    documents: Vec<DocumentEntry>,
    histories: HashMap<String, Vec<HistoryEntry>>,
    selected: Option<String>,
    pending_purge: Vec<DocumentEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active documents in upload order.
    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether a document with this file name is active.
    pub fn contains_file(&self, file_name: &str) -> bool {
        self.find_by_name(file_name).is_some()
    }

    pub fn find_by_name(&self, file_name: &str) -> Option<&DocumentEntry> {
        self.documents.iter().find(|d| d.file_name == file_name)
    }

    pub fn document(&self, document_id: &str) -> Option<&DocumentEntry> {
        self.documents.iter().find(|d| d.id == document_id)
    }

    /// The selected document, falling back to the first active one.
    pub fn selected(&self) -> Option<&DocumentEntry> {
        self.selected
            .as_deref()
            .and_then(|id| self.document(id))
            .or_else(|| self.documents.first())
    }

    /// Select a document by file name.
    pub fn select(&mut self, file_name: &str) -> Result<&DocumentEntry> {
        let index = self
            .documents
            .iter()
            .position(|d| d.file_name == file_name)
            .ok_or_else(|| RagError::UnknownDocument(file_name.to_string()))?;
        self.select_index(index)
    }

    /// Select a document by its zero-based position in [`documents`](Self::documents).
    pub fn select_index(&mut self, index: usize) -> Result<&DocumentEntry> {
        let entry = self
            .documents
            .get(index)
            .ok_or_else(|| RagError::UnknownDocument(format!("#{}", index + 1)))?;
        self.selected = Some(entry.id.clone());
        Ok(entry)
    }

    /// The chat history of a document, oldest first.
    pub fn history(&self, document_id: &str) -> Result<&[HistoryEntry]> {
        self.histories
            .get(document_id)
            .map(Vec::as_slice)
            .ok_or_else(|| RagError::UnknownDocument(document_id.to_string()))
    }

    /// Empty one document's history. Other documents are untouched.
    pub fn clear_history(&mut self, document_id: &str) -> Result<()> {
        let history = self
            .histories
            .get_mut(document_id)
            .ok_or_else(|| RagError::UnknownDocument(document_id.to_string()))?;
        history.clear();
        Ok(())
    }

    /// Pruned documents whose index records are still waiting to be deleted.
    pub fn pending_purge(&self) -> &[DocumentEntry] {
        &self.pending_purge
    }

    pub(crate) fn take_pending_purge(&mut self) -> Vec<DocumentEntry> {
        std::mem::take(&mut self.pending_purge)
    }

    pub(crate) fn defer_purge(&mut self, entry: DocumentEntry) {
        self.pending_purge.push(entry);
    }

    /// Register a freshly indexed document with an empty history.
    pub(crate) fn register(&mut self, entry: DocumentEntry) {
        self.histories.insert(entry.id.clone(), Vec::new());
        self.documents.push(entry);
    }

    pub(crate) fn record(&mut self, document_id: &str, entry: HistoryEntry) -> Result<()> {
        let history = self
            .histories
            .get_mut(document_id)
            .ok_or_else(|| RagError::UnknownDocument(document_id.to_string()))?;
        history.push(entry);
        Ok(())
    }

    /// Drop every document whose file name is not in `active_names`, along with
    /// its history. Returns the dropped entries in their former order.
    pub(crate) fn retain_files<S: AsRef<str>>(&mut self, active_names: &[S]) -> Vec<DocumentEntry> {
        let active: HashSet<&str> = active_names.iter().map(AsRef::as_ref).collect();
        let (kept, pruned): (Vec<_>, Vec<_>) =
            self.documents.drain(..).partition(|d| active.contains(d.file_name.as_str()));
        self.documents = kept;

        for entry in &pruned {
            self.histories.remove(&entry.id);
            if self.selected.as_deref() == Some(entry.id.as_str()) {
                self.selected = None;
            }
        }

        pruned
    }
}
