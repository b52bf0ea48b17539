//! Business-card record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::schema::{ExtractedRecord, FieldSchema, Schema};
use crate::rules::validate_email;

/// Business-card fields in prompt order.
pub const BUSINESS_CARD_FIELDS: FieldSchema = FieldSchema::new(
    "business_card",
    &[
        "company_name",
        "phone_number",
        "email",
        "contact_person_name",
        "website_url",
        "address",
    ],
);

const PROMPT: &str = r#"
Analyze this business card and extract the following information in proper JSON format:

{
  "company_name": "",
  "phone_number": "",
  "email": "",
  "contact_person_name": "",
  "website_url": "",
  "address": ""
}

STRICTLY RETURN ONLY JSON with no extra text. If any field is not found, return empty string.
"#;

/// Contact details read from a business card. Absent fields are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCard {
    pub company_name: String,
    pub phone_number: String,
    pub email: String,
    pub contact_person_name: String,
    pub website_url: String,
    pub address: String,
}

impl From<ExtractedRecord> for BusinessCard {
    fn from(mut record: ExtractedRecord) -> Self {
        Self {
            company_name: record.take("company_name"),
            phone_number: record.take("phone_number"),
            email: record.take("email"),
            contact_person_name: record.take("contact_person_name"),
            website_url: record.take("website_url"),
            address: record.take("address"),
        }
    }
}

impl Schema for BusinessCard {
    const NAME: &'static str = "business_card";

    fn prompt() -> &'static str {
        PROMPT
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        BUSINESS_CARD_FIELDS.from_object(object).into()
    }

    fn from_fallback(candidate: &str) -> Self {
        BUSINESS_CARD_FIELDS.from_fallback(candidate).into()
    }

    fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if *self == Self::default() {
            issues.push("No business card data extracted".to_string());
            return issues;
        }

        if !self.email.is_empty() && !validate_email(&self.email) {
            issues.push(format!("Email does not look valid: {}", self.email));
        }

        if self.company_name.is_empty() && self.contact_person_name.is_empty() {
            issues.push("Missing company and contact name".to_string());
        }

        issues
    }
}
