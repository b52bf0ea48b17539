//! Record schemas and configuration.

pub mod card;
pub mod config;
pub mod invoice;
pub mod schema;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use card::BusinessCard;
use invoice::GstInvoice;
use schema::Schema;

/// The kind of document being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    BusinessCard,
    Invoice,
}

impl ScanKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScanKind::BusinessCard => BusinessCard::NAME,
            ScanKind::Invoice => GstInvoice::NAME,
        }
    }

    /// Prompt sent to the model for this kind.
    pub fn prompt(&self) -> &'static str {
        match self {
            ScanKind::BusinessCard => BusinessCard::prompt(),
            ScanKind::Invoice => GstInvoice::prompt(),
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "business_card" | "business-card" => Ok(ScanKind::BusinessCard),
            "invoice" | "gst_invoice" | "gst-invoice" => Ok(ScanKind::Invoice),
            other => Err(format!("unknown scan kind: {other}")),
        }
    }
}

/// A repaired record of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScanRecord {
    BusinessCard(BusinessCard),
    Invoice(GstInvoice),
}

impl ScanRecord {
    pub fn kind(&self) -> ScanKind {
        match self {
            ScanRecord::BusinessCard(_) => ScanKind::BusinessCard,
            ScanRecord::Invoice(_) => ScanKind::Invoice,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        match self {
            ScanRecord::BusinessCard(card) => card.validate(),
            ScanRecord::Invoice(invoice) => invoice.validate(),
        }
    }

    pub fn as_business_card(&self) -> Option<&BusinessCard> {
        match self {
            ScanRecord::BusinessCard(card) => Some(card),
            ScanRecord::Invoice(_) => None,
        }
    }

    pub fn as_invoice(&self) -> Option<&GstInvoice> {
        match self {
            ScanRecord::Invoice(invoice) => Some(invoice),
            ScanRecord::BusinessCard(_) => None,
        }
    }
}
