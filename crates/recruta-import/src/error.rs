//! Error types for the import pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that can occur while importing pareceres.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] recruta_db::DbError),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Parse error for {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

impl From<ImportError> for recruta_core::Error {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Io(e) => recruta_core::Error::Io(e),
            ImportError::Database(e) => e.into(),
            other => recruta_core::Error::Import(other.to_string()),
        }
    }
}
