//! Tolerant repair of model responses into schema-complete records.
//!
//! The pipeline is synchronous and pure:
//!
//! ```text
//! raw ─▶ normalize ─▶ extract_candidate ─▶ coerce ─▶ parse ─┬─▶ Schema::from_object
//!                                                           └─▶ Schema::from_fallback
//! ```
//!
//! There is no failure state. A structural parse failure switches to
//! per-field regex recovery, and missing fields default to `""`.

mod coerce;
mod extract;
mod fallback;
mod normalize;
pub mod patterns;

pub use coerce::{coerce, quote_keys, quote_values};
pub use extract::extract_candidate;
pub use fallback::{find_array_objects, find_field, find_section};
pub use normalize::{
    escape_line_breaks, normalize, remove_control_chars, strip_code_fences, trim_whitespace,
};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::schema::{ExtractedRecord, FieldSchema, Schema};
use crate::models::{ScanKind, ScanRecord};

/// Which branch produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairOutcome {
    /// The coerced candidate parsed as a JSON object.
    Parsed,
    /// Parsing failed; fields were recovered one by one.
    Fallback,
}

/// A repaired record together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired<T> {
    pub record: T,
    pub outcome: RepairOutcome,
    /// The coerced candidate text that was parsed or scanned.
    pub candidate: String,
}

impl<T> Repaired<T> {
    /// Convert the record, keeping outcome and candidate.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Repaired<U> {
        Repaired {
            record: f(self.record),
            outcome: self.outcome,
            candidate: self.candidate,
        }
    }
}

/// Normalize, extract and coerce a raw response into the text that gets parsed.
pub fn prepare(raw: &str) -> String {
    let normalized = normalize(raw);
    coerce(extract_candidate(&normalized))
}

fn run<T>(
    raw: &str,
    schema_name: &str,
    from_object: impl FnOnce(&Map<String, Value>) -> T,
    from_fallback: impl FnOnce(&str) -> T,
) -> Repaired<T> {
    let candidate = prepare(raw);
    debug!("Cleaned {} candidate: {}", schema_name, candidate);

    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(object)) => Repaired {
            record: from_object(&object),
            outcome: RepairOutcome::Parsed,
            candidate,
        },
        Ok(other) => {
            warn!(
                "{} response parsed to a non-object ({}), attempting manual extraction",
                schema_name,
                json_kind(&other)
            );
            Repaired {
                record: from_fallback(&candidate),
                outcome: RepairOutcome::Fallback,
                candidate,
            }
        }
        Err(e) => {
            warn!("{} JSON parse failed ({}), attempting manual extraction", schema_name, e);
            Repaired {
                record: from_fallback(&candidate),
                outcome: RepairOutcome::Fallback,
                candidate,
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Repair a raw model response into a typed record.
pub fn repair<T: Schema>(raw: &str) -> Repaired<T> {
    run(raw, T::NAME, T::from_object, T::from_fallback)
}

/// Repair a raw model response against a flat field schema.
pub fn repair_fields(raw: &str, schema: &FieldSchema) -> Repaired<ExtractedRecord> {
    run(
        raw,
        schema.name,
        |object| schema.from_object(object),
        |text| schema.from_fallback(text),
    )
}

/// Repair a raw model response for the given scan kind.
pub fn repair_as(kind: ScanKind, raw: &str) -> Repaired<ScanRecord> {
    match kind {
        ScanKind::BusinessCard => repair(raw).map(ScanRecord::BusinessCard),
        ScanKind::Invoice => repair(raw).map(ScanRecord::Invoice),
    }
}
