//! Error types for Recruta.

use thiserror::Error;

/// Core error type shared across the Recruta crates.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Import error: {0}")]
    Import(String),
}

/// Result type alias using Recruta's Error.
pub type Result<T> = std::result::Result<T, Error>;
