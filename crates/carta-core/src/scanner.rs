//! Capture → inference → repair, one scan at a time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use carta_inference::{
    GeminiBackend, GeminiConfig, GenerationConfig, InferenceBackend, InferenceRequest,
};

use crate::capture::CapturedImage;
use crate::error::{CartaError, Result};
use crate::models::config::CartaConfig;
use crate::models::schema::Schema;
use crate::models::{ScanKind, ScanRecord};
use crate::repair::{RepairOutcome, Repaired, repair, repair_as};
use crate::session::{RequestGuard, RequestToken};

/// Result of a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct Scan<T> {
    /// The repaired record.
    pub record: T,
    /// Whether the response parsed or was recovered field by field.
    pub outcome: RepairOutcome,
    /// Model response text as received.
    pub raw_response: String,
    /// Advisory issues from validation.
    pub warnings: Vec<String>,
    /// Request this scan belonged to.
    pub token: RequestToken,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs scans against an inference backend.
pub struct Scanner {
    backend: Arc<dyn InferenceBackend>,
    generation: GenerationConfig,
    timeout: Option<Duration>,
    guard: RequestGuard,
}

impl Scanner {
    /// Create a scanner with default generation settings and no deadline.
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            backend,
            generation: GenerationConfig::default(),
            timeout: None,
            guard: RequestGuard::new(),
        }
    }

    /// Create a Gemini-backed scanner from configuration.
    pub fn from_config(config: &CartaConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        let backend = GeminiBackend::new(
            GeminiConfig::new(api_key)
                .with_base_url(&config.inference.base_url)
                .with_model(&config.inference.model),
        )?;

        let mut scanner =
            Self::new(Arc::new(backend)).with_generation(config.inference.generation());
        if let Some(secs) = config.inference.timeout_secs {
            scanner = scanner.with_timeout(Duration::from_secs(secs));
        }
        Ok(scanner)
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Bound each model call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The single-flight guard, for resetting on retake.
    pub fn guard(&self) -> &RequestGuard {
        &self.guard
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Scan an image into a typed record.
    pub async fn scan<T: Schema>(&self, image: &CapturedImage) -> Result<Scan<T>> {
        let (response, token, start) = self.request(T::NAME, T::prompt(), image).await?;
        let repaired: Repaired<T> = repair(&response);
        let warnings = repaired.record.validate();
        Ok(finish(repaired, response, warnings, token, start))
    }

    /// Scan an image as the given kind.
    pub async fn scan_kind(&self, kind: ScanKind, image: &CapturedImage) -> Result<Scan<ScanRecord>> {
        let (response, token, start) = self.request(kind.name(), kind.prompt(), image).await?;
        let repaired = repair_as(kind, &response);
        let warnings = repaired.record.validate();
        Ok(finish(repaired, response, warnings, token, start))
    }

    async fn request(
        &self,
        name: &str,
        prompt: &str,
        image: &CapturedImage,
    ) -> Result<(String, RequestToken, Instant)> {
        if image.data.is_empty() {
            return Err(crate::error::CaptureError::Empty.into());
        }

        let ticket = self.guard.begin()?;
        let token = ticket.token();
        let start = Instant::now();
        info!(
            "Scanning {} with {} ({}, {} bytes)",
            name,
            self.backend.model_name(),
            image.mime_type,
            image.decoded_len()
        );

        let request =
            InferenceRequest::new(prompt, image.to_inline()).with_generation(self.generation.clone());
        let response = self.generate(&request).await;

        if !ticket.complete() {
            warn!("Scan {} finished after a newer request, discarding", token.id());
            return Err(CartaError::Superseded);
        }

        Ok((response?, token, start))
    }

    async fn generate(&self, request: &InferenceRequest) -> Result<String> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.backend.generate(request))
                .await
                .map_err(|_| CartaError::Timeout { limit })?
                .map_err(CartaError::from),
            None => Ok(self.backend.generate(request).await?),
        }
    }
}

fn finish<T>(
    repaired: Repaired<T>,
    raw_response: String,
    warnings: Vec<String>,
    token: RequestToken,
    start: Instant,
) -> Scan<T> {
    let processing_time_ms = start.elapsed().as_millis() as u64;
    info!(
        "Scan {} complete in {}ms ({:?})",
        token.id(),
        processing_time_ms,
        repaired.outcome
    );

    Scan {
        record: repaired.record,
        outcome: repaired.outcome,
        raw_response,
        warnings,
        token,
        processing_time_ms,
    }
}
