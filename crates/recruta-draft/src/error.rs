//! Error types for narrative drafting.

use thiserror::Error;

/// Errors that can occur when talking to the text generation service.
#[derive(Error, Debug)]
pub enum DraftError {
    /// Drafting is switched off in the configuration.
    #[error("Text generation is disabled in the configuration")]
    Disabled,

    /// The configured API key variable is not set.
    #[error("Missing API key: set the {var} environment variable")]
    MissingCredential { var: String },

    /// The service could not be reached.
    #[error("Text generation service is not reachable at {host}")]
    ServerNotRunning { host: String },

    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The requested model is not available.
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered with no text.
    #[error("Empty response from text generation service")]
    EmptyResponse,

    /// Could not start the async runtime.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DraftError {
    /// Whether the service as a whole is unusable, as opposed to one failed request.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DraftError::Disabled
                | DraftError::MissingCredential { .. }
                | DraftError::ServerNotRunning { .. }
                | DraftError::Runtime(_)
        )
    }
}

/// Result type for drafting operations.
pub type DraftResult<T> = Result<T, DraftError>;
