//! Backend that replays a fixed response.

use async_trait::async_trait;
use tracing::debug;

use crate::{InferenceBackend, InferenceError, InferenceRequest, Result};

/// Backend returning the same response text for every request.
///
/// Used for offline scans (`carta scan --response-file`) and in tests.
#[derive(Debug, Clone)]
pub struct StaticBackend {
    response: String,
}

impl StaticBackend {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl InferenceBackend for StaticBackend {
    async fn generate(&self, request: &InferenceRequest) -> Result<String> {
        debug!(
            "Static backend answering {} prompt chars with {} response chars",
            request.prompt.len(),
            self.response.len()
        );

        if self.response.is_empty() {
            return Err(InferenceError::EmptyResponse);
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InlineImage;

    fn request() -> InferenceRequest {
        InferenceRequest::new(
            "prompt",
            InlineImage {
                data: String::new(),
                mime_type: "image/jpeg".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_static_backend_returns_response() {
        let backend = StaticBackend::new("{\"email\": \"a@b.com\"}");
        let text = backend.generate(&request()).await.unwrap();
        assert_eq!(text, "{\"email\": \"a@b.com\"}");
        assert_eq!(backend.model_name(), "static");
    }

    #[tokio::test]
    async fn test_static_backend_empty_is_error() {
        let backend = StaticBackend::new("");
        let err = backend.generate(&request()).await.unwrap_err();
        assert!(matches!(err, InferenceError::EmptyResponse));
    }
}
