//! Inference backend implementations.

#[cfg(feature = "gemini")]
pub mod gemini;

pub mod fixed;

use async_trait::async_trait;

use crate::{InferenceRequest, Result};

/// Trait for generative-model backends.
///
/// A backend takes a prompt and an inline image and returns the model's raw
/// text. It does not interpret that text: the response may or may not be
/// JSON, and repairing it is the caller's job.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Run one generation request and return the raw response text.
    async fn generate(&self, request: &InferenceRequest) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
