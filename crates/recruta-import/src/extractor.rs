//! Text extraction from parecer files.

use crate::error::{ImportError, ImportResult};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::debug;

/// Turns a document on disk into raw text.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of the file at `path`.
    fn extract(&self, path: &Path) -> ImportResult<String>;

    /// Get the supported file extensions.
    fn extensions(&self) -> &[&str];

    /// Check if this extractor supports the given extension.
    fn supports(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Extractor for PDF files.
#[derive(Debug, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> ImportResult<String> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.to_path_buf()));
        }

        debug!("Extracting PDF text: {:?}", path);
        let bytes = std::fs::read(path)?;

        // pdf-extract panics on some malformed files instead of returning an error
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| ImportError::Parse {
            path: path.to_path_buf(),
            message: "PDF reader aborted on malformed document".to_string(),
        })?
        .map_err(|e| ImportError::Parse {
            path: path.to_path_buf(),
            message: format!("Failed to extract text from PDF: {}", e),
        })?;

        debug!("Extracted {} pages from {:?}", pages.len(), path);
        Ok(pages.join("\n"))
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

/// Extractor for plain-text exports of pareceres.
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> ImportResult<String> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn extensions(&self) -> &[&str] {
        &["txt"]
    }
}

/// Picks an extractor by file extension.
pub struct FileTextExtractor {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl FileTextExtractor {
    pub fn new() -> Self {
        Self {
            extractors: vec![
                Box::new(PdfTextExtractor::new()),
                Box::new(PlainTextExtractor::new()),
            ],
        }
    }
}

impl Default for FileTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for FileTextExtractor {
    fn extract(&self, path: &Path) -> ImportResult<String> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        self.extractors
            .iter()
            .find(|e| e.supports(extension))
            .ok_or_else(|| ImportError::UnsupportedFileType(extension.to_string()))?
            .extract(path)
    }

    fn extensions(&self) -> &[&str] {
        &["pdf", "txt"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extension_support() {
        let pdf = PdfTextExtractor::new();
        assert!(pdf.supports("pdf"));
        assert!(pdf.supports("PDF"));
        assert!(!pdf.supports("txt"));
    }

    #[test]
    fn test_plain_text_extraction() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parecer.txt");
        std::fs::write(&path, "Cliente: Acme Corp\n").unwrap();

        let text = FileTextExtractor::new().extract(&path).unwrap();
        assert_eq!(text, "Cliente: Acme Corp\n");
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let err = FileTextExtractor::new().extract(&path).unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.pdf");
        assert!(matches!(
            PdfTextExtractor::new().extract(&missing),
            Err(ImportError::FileNotFound(_))
        ));

        let docx = dir.path().join("parecer.docx");
        std::fs::write(&docx, b"PK").unwrap();
        assert!(matches!(
            FileTextExtractor::new().extract(&docx),
            Err(ImportError::UnsupportedFileType(_))
        ));
    }
}
