//! Error types for the completion layer.

use thiserror::Error;

/// Errors that can occur while talking to a model service.
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key was configured.
    #[error("no API key configured (set {0})")]
    MissingApiKey(String),

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service answered without any choices.
    #[error("model returned no choices")]
    EmptyResponse,

    /// The response body was not the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
