//! Error types for the inference layer.

use thiserror::Error;

/// Errors that can occur while calling a generative model.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// No API key was configured for a backend that needs one.
    #[error("missing API key")]
    MissingApiKey,

    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The API answered successfully but without any text.
    #[error("model returned no text")]
    EmptyResponse,

    /// The API response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
