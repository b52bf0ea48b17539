//! Error types for the carta-core library.
//!
//! The repair pipeline itself never fails; these errors belong to the
//! collaborators around it (capture, inference, configuration).

use std::time::Duration;

use thiserror::Error;

/// Main error type for the carta library.
#[derive(Error, Debug)]
pub enum CartaError {
    /// Capture error.
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Inference error from the inference layer.
    #[cfg(feature = "native")]
    #[error("inference error: {0}")]
    Inference(#[from] carta_inference::InferenceError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A scan is already in flight.
    #[error("a scan is already in progress")]
    Busy,

    /// The scan finished after a newer one had started; its result was dropped.
    #[error("scan was superseded by a newer request")]
    Superseded,

    /// The inference call exceeded the configured deadline.
    #[error("inference timed out after {limit:?}")]
    Timeout { limit: Duration },
}

/// Errors related to image capture.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The string is not a `data:<mime>;base64,<data>` URL.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// The payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The bytes are neither a recognised image nor a PDF.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Nothing was captured.
    #[error("no image captured")]
    Empty,
}

impl CartaError {
    /// Short message suitable for showing to the person scanning.
    pub fn user_message(&self) -> &'static str {
        match self {
            CartaError::Capture(CaptureError::Empty) => "Please capture a photo first!",
            CartaError::Capture(_) | CartaError::Image(_) => {
                "Failed to capture photo. Please try again."
            }
            CartaError::Io(_) => "Could not read the selected file.",
            #[cfg(feature = "native")]
            CartaError::Inference(_) => "Error processing scan. Please try again.",
            CartaError::Timeout { .. } => "The scan took too long. Please try again.",
            CartaError::Config(_) => "Scanner is not configured. Check the API key.",
            CartaError::Busy => "A scan is already in progress.",
            CartaError::Superseded => "This scan was replaced by a newer one.",
        }
    }
}

/// Result type for the carta library.
pub type Result<T> = std::result::Result<T, CartaError>;
