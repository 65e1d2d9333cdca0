//! Document Loader — turns uploaded bytes into plain text.
//!
//! PDF extraction runs in memory via `pdf-extract`; page texts are joined in
//! page order. The optional upload spool only mirrors uploads to disk.

pub mod spool;

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("document is empty")]
    EmptyInput,
}

/// Extracts per-page text from a paginated document.
pub trait DocumentLoader: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// `pdf-extract` backed loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }
        // pdf-extract panics on some malformed inputs instead of returning Err
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| ExtractionError::Pdf("extractor aborted on malformed input".to_string()))?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))
    }
}

/// An uploaded file, held in memory for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(file_name: Option<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Plain-text uploads skip the PDF loader.
    pub fn is_plain_text(&self) -> bool {
        let by_type = self
            .content_type
            .as_deref()
            .map(|ct| ct.starts_with("text/plain"))
            .unwrap_or(false);
        let by_name = self
            .file_name
            .as_deref()
            .map(|n| n.to_ascii_lowercase().ends_with(".txt"))
            .unwrap_or(false);
        by_type || by_name
    }
}

/// Returns the document's full text: page texts joined with newlines.
pub fn load_text(loader: &dyn DocumentLoader, document: &Document) -> Result<String, ExtractionError> {
    if document.is_plain_text() {
        if document.bytes.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }
        return Ok(String::from_utf8_lossy(&document.bytes).into_owned());
    }
    let pages = loader.extract_pages(&document.bytes)?;
    Ok(pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PagesLoader(Vec<&'static str>);

    impl DocumentLoader for PagesLoader {
        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    fn pdf(bytes: &'static [u8]) -> Document {
        Document::new(
            Some("resume.pdf".to_string()),
            Some("application/pdf".to_string()),
            Bytes::from_static(bytes),
        )
    }

    #[test]
    fn test_pages_joined_in_order() {
        let loader = PagesLoader(vec!["page one", "page two", ""]);
        let text = load_text(&loader, &pdf(b"%PDF")).unwrap();
        assert_eq!(text, "page one\npage two\n");
    }

    #[test]
    fn test_plain_text_bypasses_loader() {
        let loader = PagesLoader(vec!["should not be used"]);
        let doc = Document::new(
            Some("jd.TXT".to_string()),
            None,
            Bytes::from_static(b"Rust engineer wanted"),
        );
        assert_eq!(load_text(&loader, &doc).unwrap(), "Rust engineer wanted");
    }

    #[test]
    fn test_plain_text_detected_by_content_type() {
        let doc = Document::new(
            None,
            Some("text/plain; charset=utf-8".to_string()),
            Bytes::from_static(b"x"),
        );
        assert!(doc.is_plain_text());
        assert!(!pdf(b"%PDF").is_plain_text());
    }

    #[test]
    fn test_pdf_loader_rejects_empty_bytes() {
        assert!(matches!(
            PdfLoader.extract_pages(&[]),
            Err(ExtractionError::EmptyInput)
        ));
    }

    #[test]
    fn test_pdf_loader_rejects_garbage() {
        let result = PdfLoader.extract_pages(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }
}
