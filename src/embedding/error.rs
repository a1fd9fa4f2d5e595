//! Embedding provider error types.

use thiserror::Error;

/// Errors surfaced by embedding providers.
///
/// The pipeline never lets these abort a batch: a failing PR is excluded
/// from clustering and carries the failure on its scorecard instead.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Transport-level failure talking to the embedding endpoint.
    #[error("embedding request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("embedding endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },

    /// The response carried fewer vectors than inputs.
    #[error("embedding response missing vector for input {index}")]
    MissingVector { index: usize },

    /// The HTTP provider was requested without an API key.
    #[error("no API key configured for the HTTP embedding provider")]
    MissingApiKey,

    /// Provider declared itself unable to embed this input.
    #[error("embedding unavailable: {reason}")]
    Unavailable { reason: String },
}
