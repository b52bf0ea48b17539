//! WASM bindings for business-card and GST invoice scanning.
//!
//! The browser captures the frame and calls the model itself; these
//! bindings repair the model's text and keep stale responses out.

use std::cell::Cell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use carta_core::{
    BusinessCard, CapturedImage, GstInvoice, RepairOutcome, RequestGuard, ScanKind, Schema,
    repair,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RepairResult<T> {
    record: T,
    outcome: RepairOutcome,
    candidate: String,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processing_time_ms: Option<u64>,
}

fn repair_to_js<T: Schema>(raw: &str, processing_time_ms: Option<u64>) -> Result<JsValue, JsValue> {
    let repaired = repair::<T>(raw);
    if repaired.outcome == RepairOutcome::Fallback {
        web_sys::console::warn_1(
            &format!("{}: JSON parse failed, recovered fields individually", T::NAME).into(),
        );
    }

    let warnings = repaired.record.validate();
    let result = RepairResult {
        record: repaired.record,
        outcome: repaired.outcome,
        candidate: repaired.candidate,
        warnings,
        processing_time_ms,
    };

    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Repair a raw model response into a business card.
///
/// Returns `{ record, outcome, candidate, warnings }`. Never fails on bad
/// model text; missing fields are empty strings.
#[wasm_bindgen]
pub fn repair_business_card(raw: &str) -> Result<JsValue, JsValue> {
    repair_to_js::<BusinessCard>(raw, None)
}

/// Repair a raw model response into a GST invoice.
#[wasm_bindgen]
pub fn repair_invoice(raw: &str) -> Result<JsValue, JsValue> {
    repair_to_js::<GstInvoice>(raw, None)
}

/// Strip code fences, surrounding whitespace and control characters.
#[wasm_bindgen]
pub fn normalize_response(raw: &str) -> String {
    carta_core::repair::normalize(raw)
}

/// Split a camera screenshot data URL into `{ data, mimeType }`.
#[wasm_bindgen]
pub fn parse_data_url(url: &str) -> Result<JsValue, JsValue> {
    let image = CapturedImage::from_data_url(url)
        .map_err(|e| JsValue::from_str(e.user_message()))?;

    serde_wasm_bindgen::to_value(&image).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Prompt to send with the image for `"card"` or `"invoice"`.
#[wasm_bindgen]
pub fn prompt_for(kind: &str) -> Result<String, JsValue> {
    let kind: ScanKind = kind.parse().map_err(|e: String| JsValue::from_str(&e))?;
    Ok(kind.prompt().to_string())
}

/// Validate a GSTIN including its check character.
#[wasm_bindgen]
pub fn validate_gstin(gstin: &str) -> bool {
    carta_core::rules::validate_gstin(gstin)
}

/// One scan at a time for a page.
///
/// Call `begin()` before sending the model request, `reset()` on retake,
/// and pass the token back to `finish_*` with the response text.
#[wasm_bindgen]
pub struct ScanSession {
    guard: RequestGuard,
    started_at: Cell<f64>,
}

#[wasm_bindgen]
impl ScanSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            guard: RequestGuard::new(),
            started_at: Cell::new(0.0),
        }
    }

    /// Start a scan. Throws while another scan is in flight.
    #[wasm_bindgen]
    pub fn begin(&self) -> Result<u64, JsValue> {
        let token = self
            .guard
            .begin()
            .map(|ticket| ticket.detach())
            .map_err(|e| JsValue::from_str(e.user_message()))?;
        self.started_at.set(js_sys::Date::now());
        Ok(token.id())
    }

    /// Retake: clear the busy state and ignore any in-flight response.
    #[wasm_bindgen]
    pub fn reset(&self) {
        self.guard.reset();
    }

    #[wasm_bindgen]
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Finish a business-card scan. Returns `null` if the scan was superseded.
    #[wasm_bindgen]
    pub fn finish_business_card(&self, token: u64, raw: &str) -> Result<JsValue, JsValue> {
        if !self.guard.complete(token.into()) {
            return Ok(JsValue::NULL);
        }
        repair_to_js::<BusinessCard>(raw, Some(self.elapsed_ms()))
    }

    /// Finish an invoice scan. Returns `null` if the scan was superseded.
    #[wasm_bindgen]
    pub fn finish_invoice(&self, token: u64, raw: &str) -> Result<JsValue, JsValue> {
        if !self.guard.complete(token.into()) {
            return Ok(JsValue::NULL);
        }
        repair_to_js::<GstInvoice>(raw, Some(self.elapsed_ms()))
    }

    /// Release the session after a failed model call.
    #[wasm_bindgen]
    pub fn fail(&self, token: u64) {
        self.guard.complete(token.into());
    }
}

impl ScanSession {
    fn elapsed_ms(&self) -> u64 {
        (js_sys::Date::now() - self.started_at.get()).max(0.0) as u64
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validate_gstin() {
        assert!(validate_gstin("27AAPFU0939F1ZV"));
        assert!(!validate_gstin("27AAPFU0939F1ZA"));
    }

    #[wasm_bindgen_test]
    fn test_normalize_response() {
        assert_eq!(normalize_response("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[wasm_bindgen_test]
    fn test_prompt_for() {
        assert!(prompt_for("invoice").unwrap().contains("grand_total"));
        assert!(prompt_for("card").unwrap().contains("company_name"));
    }

    #[wasm_bindgen_test]
    fn test_session_drops_superseded_result() {
        let session = ScanSession::new();
        let first = session.begin().unwrap();
        assert!(session.is_busy());

        session.reset();
        let second = session.begin().unwrap();

        assert!(session.finish_business_card(first, "{}").unwrap().is_null());
        assert!(!session.finish_business_card(second, "{}").unwrap().is_null());
        assert!(!session.is_busy());
    }
}
