//! Recruta Draft - Narrative drafting for pareceres.
//!
//! Drafting goes through the [`TextGenerator`] seam; the bundled
//! [`HttpGenerator`] talks to an Ollama-compatible `/api/generate` endpoint.

mod client;
mod drafter;
mod error;
mod types;

pub use client::{HttpGenerator, TextGenerator};
pub use drafter::{DraftInput, Drafter, Narratives};
pub use error::{DraftError, DraftResult};
pub use types::{GenerateOptions, GenerateRequest, GenerateResponse};
