//! Request types shared by all inference backends.

use serde::{Deserialize, Serialize};

/// An image passed inline with the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    /// Base64-encoded image bytes (no `data:` prefix).
    pub data: String,

    /// MIME type, e.g. `image/jpeg` or `application/pdf`.
    pub mime_type: String,
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub candidate_count: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 500,
            candidate_count: 1,
        }
    }
}

/// A single prompt + image generation request.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub prompt: String,
    pub image: InlineImage,
    pub generation: GenerationConfig,
}

impl InferenceRequest {
    /// Create a request with default generation settings.
    pub fn new(prompt: impl Into<String>, image: InlineImage) -> Self {
        Self {
            prompt: prompt.into(),
            image,
            generation: GenerationConfig::default(),
        }
    }

    /// Override the generation settings.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generation_config_serializes_camel_case() {
        let json = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(json["maxOutputTokens"], 500);
        assert_eq!(json["candidateCount"], 1);
    }

    #[test]
    fn test_inline_image_serializes_mime_type() {
        let image = InlineImage {
            data: "AAAA".to_string(),
            mime_type: "image/png".to_string(),
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["mimeType"], "image/png");
    }
}
