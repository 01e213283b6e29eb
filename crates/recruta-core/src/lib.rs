//! Recruta Core - Domain types for the Recruta recruiting back office.

mod error;
mod types;

pub use error::{Error, Result};
pub use types::*;
