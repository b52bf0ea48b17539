//! Captured images as base64 payloads ready for the model.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CaptureError, Result};
use crate::models::config::CaptureConfig;

const PDF_MAGIC: &[u8] = b"%PDF";
const PDF_MIME: &str = "application/pdf";
const JPEG_MIME: &str = "image/jpeg";

/// An image (or PDF) encoded as base64 with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedImage {
    /// Base64 payload without the data URL prefix.
    pub data: String,
    pub mime_type: String,
}

impl CapturedImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<data>` URL as produced by a camera screenshot.
    ///
    /// The MIME type is the text between `data:` and the first `;`, the
    /// payload everything after the first `,`.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| CaptureError::InvalidDataUrl("missing data: prefix".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CaptureError::InvalidDataUrl("missing comma".to_string()))?;

        let mime_type = header.split(';').next().unwrap_or_default();
        if mime_type.is_empty() {
            return Err(CaptureError::InvalidDataUrl("missing MIME type".to_string()).into());
        }

        if payload.is_empty() {
            return Err(CaptureError::Empty.into());
        }
        STANDARD.decode(payload).map_err(CaptureError::from)?;

        Ok(Self::new(payload, mime_type))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Encode raw file bytes, fitting images into the configured frame.
    ///
    /// PDFs pass through untouched. Images that already fit are passed
    /// through unless `config.reencode` is set; everything else is scaled
    /// down and re-encoded as JPEG.
    pub fn from_bytes(bytes: &[u8], config: &CaptureConfig) -> Result<Self> {
        if bytes.is_empty() {
            return Err(CaptureError::Empty.into());
        }

        if bytes.starts_with(PDF_MAGIC) {
            debug!("Captured PDF ({} bytes)", bytes.len());
            return Ok(Self::new(STANDARD.encode(bytes), PDF_MIME));
        }

        let format = image::guess_format(bytes)
            .map_err(|_| CaptureError::UnsupportedFormat("unrecognised file content".to_string()))?;

        let (width, height) = ImageReader::with_format(Cursor::new(bytes), format).into_dimensions()?;
        let oversized = width > config.max_width || height > config.max_height;

        if !oversized && !config.reencode {
            debug!("Captured {:?} image {}x{}", format, width, height);
            return Ok(Self::new(STANDARD.encode(bytes), format.to_mime_type()));
        }

        let image = image::load_from_memory_with_format(bytes, format)?;
        Self::from_image(&image, config)
    }

    /// Read and encode a file from disk.
    pub fn from_path(path: &Path, config: &CaptureConfig) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(&bytes, config)
    }

    /// Encode a decoded frame as JPEG, scaled down to fit the configured frame.
    pub fn from_image(image: &DynamicImage, config: &CaptureConfig) -> Result<Self> {
        let (width, height) = image.dimensions();
        let frame = if width > config.max_width || height > config.max_height {
            image.resize(config.max_width, config.max_height, FilterType::Lanczos3)
        } else {
            image.clone()
        };

        let mut buf = Vec::new();
        let quality = config.jpeg_quality.clamp(1, 100);
        DynamicImage::ImageRgb8(frame.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;

        debug!(
            "Re-encoded {}x{} image as {}x{} JPEG ({} bytes)",
            width,
            height,
            frame.width(),
            frame.height(),
            buf.len()
        );
        Ok(Self::new(STANDARD.encode(&buf), JPEG_MIME))
    }

    /// Size of the payload once decoded, in bytes.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME
    }

    /// Image part for an inference request.
    #[cfg(feature = "native")]
    pub fn to_inline(&self) -> carta_inference::InlineImage {
        carta_inference::InlineImage {
            data: self.data.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Guess a MIME type for a file extension; used when bytes are already encoded.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    if ext.eq_ignore_ascii_case("pdf") {
        return Some(PDF_MIME);
    }
    ImageFormat::from_extension(ext).map(|f| f.to_mime_type())
}
