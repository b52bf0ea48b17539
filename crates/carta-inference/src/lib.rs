//! Generative-model inference abstraction for carta.
//!
//! This crate provides a unified interface for sending an image plus a
//! prompt to a remote generative model and getting back its raw text:
//! - `gemini` for the Google Generative Language API over HTTP
//! - a static backend that replays a canned response (offline runs, tests)

mod backend;
mod error;
mod request;

pub use backend::InferenceBackend;
pub use backend::fixed::StaticBackend;
pub use error::InferenceError;
pub use request::{GenerationConfig, InferenceRequest, InlineImage};

#[cfg(feature = "gemini")]
pub use backend::gemini::{GeminiBackend, GeminiConfig};

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
