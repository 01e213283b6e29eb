//! Database error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Database error: {0}")]
    Other(String),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }
}

impl From<DbError> for recruta_core::Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => recruta_core::Error::NotFound(msg),
            DbError::InvalidInput(msg) => recruta_core::Error::InvalidInput(msg),
            other => recruta_core::Error::Database(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
