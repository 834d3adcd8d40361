//! Text extraction from uploaded files.

use crate::error::Result;

/// Turns uploaded file bytes into plain text.
///
/// Extraction is synchronous and may be CPU heavy; callers run it on a
/// blocking thread.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of `bytes`. `file_name` is used for error reporting.
    ///
    /// A file that parses but contains no text yields an empty string.
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "pdf")]
mod pdf {
    use tracing::{debug, warn};

    use super::TextExtractor;
    use crate::error::{RagError, Result};

    /// Extracts PDF text with the `pdf-extract` crate.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PdfExtractor;

    impl TextExtractor for PdfExtractor {
        fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
            let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
                warn!(file_name, error = %e, "pdf extraction failed");
                RagError::ExtractionError { file_name: file_name.to_string(), message: e.to_string() }
            })?;

            if text.trim().is_empty() {
                warn!(file_name, "pdf has no extractable text");
            }
            debug!(file_name, text_len = text.len(), "extracted pdf text");
            Ok(text)
        }
    }

}
