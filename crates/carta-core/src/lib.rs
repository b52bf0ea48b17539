//! Core library for invoice and business-card scanning.
//!
//! This crate provides:
//! - Capture of camera frames and uploaded files as base64 + MIME type
//! - A tolerant repair pipeline turning loosely-structured model output
//!   into schema-complete records
//! - Business-card and GST invoice record schemas
//! - A request guard that keeps one scan in flight and discards stale results
//! - A scanner tying capture, inference and repair together (native only)

pub mod capture;
pub mod error;
pub mod models;
pub mod repair;
pub mod rules;
pub mod session;

#[cfg(feature = "native")]
pub mod scanner;

pub use capture::CapturedImage;
pub use error::{CaptureError, CartaError, Result};
pub use models::card::BusinessCard;
pub use models::config::{CaptureConfig, CartaConfig, InferenceConfig};
pub use models::invoice::{Buyer, GstInvoice, InvoiceDetails, LineItem, Seller, Totals};
pub use models::schema::{ExtractedRecord, FieldSchema, Schema};
pub use models::{ScanKind, ScanRecord};
pub use repair::{RepairOutcome, Repaired, repair, repair_as, repair_fields};
pub use session::{RequestGuard, RequestTicket, RequestToken};

#[cfg(feature = "native")]
pub use scanner::{Scan, Scanner};

/// Re-export inference types.
#[cfg(feature = "native")]
pub use carta_inference::{InferenceBackend, InferenceError, StaticBackend};
