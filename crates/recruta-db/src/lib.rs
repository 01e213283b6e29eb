//! Recruta DB - The single SQLite backing store for Recruta.
//!
//! Each entity has its own repository module under `operations`, all
//! implemented as methods on [`Database`].

mod database;
mod error;
mod migrations;
mod operations;

pub use database::Database;
pub use error::{DbError, DbResult};
pub use operations::assessments::AssessmentFilter;
