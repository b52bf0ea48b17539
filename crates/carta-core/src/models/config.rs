//! Configuration for scanning.

use serde::{Deserialize, Serialize};

use crate::error::{CartaError, Result};

/// Main configuration for carta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartaConfig {
    /// Model and API settings.
    pub inference: InferenceConfig,

    /// Image capture settings.
    pub capture: CaptureConfig,
}

/// Model and API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Model identifier.
    pub model: String,

    /// API base URL, without the `/v1beta` path.
    pub base_url: String,

    /// API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Upper bound on response length.
    pub max_output_tokens: u32,

    /// Number of candidates requested.
    pub candidate_count: u32,

    /// Deadline for a single model call (None = no deadline).
    pub timeout_secs: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: 0.1,
            max_output_tokens: 500,
            candidate_count: 1,
            timeout_secs: None,
        }
    }
}

impl InferenceConfig {
    /// API key from the config, or else from the configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }

        lookup(&self.api_key_env)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                CartaError::Config(format!(
                    "no API key: set inference.api_key or the {} environment variable",
                    self.api_key_env
                ))
            })
    }

    /// Sampling parameters for a model call.
    #[cfg(feature = "native")]
    pub fn generation(&self) -> carta_inference::GenerationConfig {
        carta_inference::GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            candidate_count: self.candidate_count,
        }
    }
}

/// Image capture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Frame width; larger images are scaled down.
    pub max_width: u32,

    /// Frame height; larger images are scaled down.
    pub max_height: u32,

    /// JPEG quality (1-100) used when re-encoding.
    pub jpeg_quality: u8,

    /// Re-encode every image as JPEG, even when it already fits.
    pub reencode: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            jpeg_quality: 95,
            reencode: false,
        }
    }
}

impl CartaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> std::result::Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// API key for the inference backend.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.inference.resolve_api_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_camera_call() {
        let config = CartaConfig::default();
        assert_eq!(config.inference.model, "gemini-2.0-flash");
        assert_eq!(config.inference.max_output_tokens, 500);
        assert_eq!(config.capture.max_width, 1920);
        assert_eq!(config.capture.jpeg_quality, 95);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: CartaConfig =
            serde_json::from_str(r#"{"inference": {"model": "gemini-1.5-pro"}}"#).unwrap();
        assert_eq!(config.inference.model, "gemini-1.5-pro");
        assert_eq!(config.inference.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.capture, CaptureConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CartaConfig::default();
        config.inference.timeout_secs = Some(30);
        config.save(&path).unwrap();

        assert_eq!(CartaConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = CartaConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_explicit_key_wins() {
        let config = InferenceConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        let key = config
            .resolve_api_key_with(|_| Some("from-env".to_string()))
            .unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_env_key_used_when_unset() {
        let config = InferenceConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        let key = config
            .resolve_api_key_with(|name| (name == "GEMINI_API_KEY").then(|| "from-env".to_string()))
            .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = InferenceConfig::default()
            .resolve_api_key_with(|_| None)
            .unwrap_err();
        assert!(matches!(err, CartaError::Config(_)));
    }
}
