//! PDF text extraction

use crate::error::ParseError;
use lopdf::Document;
use tracing::debug;

/// Converts PDF bytes into plain text
///
/// Implementations return page texts joined with `\n`. A page without
/// extractable text contributes an empty string.
pub trait PdfExtractor: Send + Sync {
    fn extract_text(&self, content: &[u8]) -> Result<String, ParseError>;
}

/// [`PdfExtractor`] reading embedded text streams with `lopdf`
///
/// No OCR and no layout reconstruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_text(&self, content: &[u8]) -> Result<String, ParseError> {
        let document =
            Document::load_mem(content).map_err(|e| ParseError::Malformed(e.to_string()))?;

        let pages: Vec<String> = document
            .get_pages()
            .into_keys()
            .map(|number| match document.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    debug!(page = number, error = %e, "No extractable text on page");
                    String::new()
                }
            })
            .collect();

        Ok(pages.join("\n"))
    }
}

/// Extract text from PDF bytes with the default extractor
pub fn extract_pdf_text(content: &[u8]) -> Result<String, ParseError> {
    LopdfExtractor.extract_text(content)
}
