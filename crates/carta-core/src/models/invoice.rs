//! GST invoice record: flat sections plus a list of line items.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::schema::{ExtractedRecord, FieldSchema, Schema};
use crate::repair::{find_array_objects, find_section};
use crate::rules::validate_gstin;

pub const SELLER_FIELDS: FieldSchema = FieldSchema::new("seller", &["name", "address", "gstin"]);

pub const INVOICE_DETAILS_FIELDS: FieldSchema =
    FieldSchema::new("invoice_details", &["number", "date"]);

pub const BUYER_FIELDS: FieldSchema = FieldSchema::new(
    "buyer",
    &["name", "billing_address", "shipping_address", "gstin"],
);

pub const LINE_ITEM_FIELDS: FieldSchema = FieldSchema::new(
    "items",
    &["description", "hsn", "qty", "rate", "tax_amount", "amount"],
);

pub const TOTALS_FIELDS: FieldSchema =
    FieldSchema::new("totals", &["taxable", "tax", "grand_total"]);

const PROMPT: &str = r#"
Analyze this GST invoice and extract the following information in proper JSON format:

{
  "seller": { "name": "", "address": "", "gstin": "" },
  "invoice_details": { "number": "", "date": "" },
  "buyer": { "name": "", "billing_address": "", "shipping_address": "", "gstin": "" },
  "items": [
    { "description": "", "hsn": "", "qty": "", "rate": "", "tax_amount": "", "amount": "" }
  ],
  "totals": { "taxable": "", "tax": "", "grand_total": "" }
}

Return one entry in "items" per invoice line, with every value as a string.
STRICTLY RETURN ONLY JSON with no extra text. If any field is not found, return empty string.
"#;

/// Issuer of the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub name: String,
    pub address: String,
    pub gstin: String,
}

impl From<ExtractedRecord> for Seller {
    fn from(mut record: ExtractedRecord) -> Self {
        Self {
            name: record.take("name"),
            address: record.take("address"),
            gstin: record.take("gstin"),
        }
    }
}

/// Invoice number and date as printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub number: String,
    pub date: String,
}

impl From<ExtractedRecord> for InvoiceDetails {
    fn from(mut record: ExtractedRecord) -> Self {
        Self {
            number: record.take("number"),
            date: record.take("date"),
        }
    }
}

/// Recipient of the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub name: String,
    pub billing_address: String,
    pub shipping_address: String,
    pub gstin: String,
}

impl From<ExtractedRecord> for Buyer {
    fn from(mut record: ExtractedRecord) -> Self {
        Self {
            name: record.take("name"),
            billing_address: record.take("billing_address"),
            shipping_address: record.take("shipping_address"),
            gstin: record.take("gstin"),
        }
    }
}

/// A single line on the invoice. Amounts are kept as printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// HSN (goods) or SAC (services) code.
    pub hsn: String,
    pub qty: String,
    pub rate: String,
    pub tax_amount: String,
    pub amount: String,
}

impl From<ExtractedRecord> for LineItem {
    fn from(mut record: ExtractedRecord) -> Self {
        Self {
            description: record.take("description"),
            hsn: record.take("hsn"),
            qty: record.take("qty"),
            rate: record.take("rate"),
            tax_amount: record.take("tax_amount"),
            amount: record.take("amount"),
        }
    }
}

/// Invoice totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub taxable: String,
    pub tax: String,
    pub grand_total: String,
}

impl From<ExtractedRecord> for Totals {
    fn from(mut record: ExtractedRecord) -> Self {
        Self {
            taxable: record.take("taxable"),
            tax: record.take("tax"),
            grand_total: record.take("grand_total"),
        }
    }
}

/// A complete GST invoice as read by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstInvoice {
    pub seller: Seller,
    pub invoice_details: InvoiceDetails,
    pub buyer: Buyer,
    pub items: Vec<LineItem>,
    pub totals: Totals,
}

fn section(object: &Map<String, Value>, schema: &FieldSchema) -> ExtractedRecord {
    match object.get(schema.name) {
        Some(Value::Object(inner)) => schema.from_object(inner),
        _ => schema.empty_record(),
    }
}

fn fallback_section(text: &str, schema: &FieldSchema) -> ExtractedRecord {
    match find_section(text, schema.name) {
        Some(body) => schema.from_fallback(body),
        None => schema.empty_record(),
    }
}

impl Schema for GstInvoice {
    const NAME: &'static str = "gst_invoice";

    fn prompt() -> &'static str {
        PROMPT
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let items = object
            .get(LINE_ITEM_FIELDS.name)
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|item| LINE_ITEM_FIELDS.from_object(item).into())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            seller: section(object, &SELLER_FIELDS).into(),
            invoice_details: section(object, &INVOICE_DETAILS_FIELDS).into(),
            buyer: section(object, &BUYER_FIELDS).into(),
            items,
            totals: section(object, &TOTALS_FIELDS).into(),
        }
    }

    fn from_fallback(candidate: &str) -> Self {
        let items = find_array_objects(candidate, LINE_ITEM_FIELDS.name)
            .into_iter()
            .map(|body| LINE_ITEM_FIELDS.from_fallback(body).into())
            .collect();

        Self {
            seller: fallback_section(candidate, &SELLER_FIELDS).into(),
            invoice_details: fallback_section(candidate, &INVOICE_DETAILS_FIELDS).into(),
            buyer: fallback_section(candidate, &BUYER_FIELDS).into(),
            items,
            totals: fallback_section(candidate, &TOTALS_FIELDS).into(),
        }
    }

    fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.seller.name.is_empty() {
            issues.push("Missing seller name".to_string());
        }

        if self.seller.gstin.is_empty() {
            issues.push("Missing seller GSTIN".to_string());
        } else if !validate_gstin(&self.seller.gstin) {
            issues.push(format!("Invalid seller GSTIN: {}", self.seller.gstin));
        }

        if !self.buyer.gstin.is_empty() && !validate_gstin(&self.buyer.gstin) {
            issues.push(format!("Invalid buyer GSTIN: {}", self.buyer.gstin));
        }

        if self.invoice_details.number.is_empty() {
            issues.push("Missing invoice number".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.totals.grand_total.is_empty() {
            issues.push("Missing grand total".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_object_fills_sections() {
        let object = json!({
            "seller": {"name": "Sharma Traders", "gstin": "27AAPFU0939F1ZV"},
            "invoice_details": {"number": "INV-7", "date": "01/04/2024"},
            "items": [
                {"description": "Cement", "hsn": "2523", "qty": "10", "amount": "3500"},
                "not an item",
                {"description": "Sand"}
            ],
            "totals": {"grand_total": "4130"}
        });

        let invoice = GstInvoice::from_object(object.as_object().unwrap());
        assert_eq!(invoice.seller.name, "Sharma Traders");
        assert_eq!(invoice.seller.address, "");
        assert_eq!(invoice.invoice_details.number, "INV-7");
        assert_eq!(invoice.buyer, Buyer::default());
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[0].hsn, "2523");
        assert_eq!(invoice.items[1].description, "Sand");
        assert_eq!(invoice.items[1].rate, "");
        assert_eq!(invoice.totals.grand_total, "4130");
    }

    #[test]
    fn test_non_object_section_defaults() {
        let object = json!({"seller": "Sharma Traders", "items": {"description": "x"}});
        let invoice = GstInvoice::from_object(object.as_object().unwrap());
        assert_eq!(invoice.seller, Seller::default());
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn test_from_fallback_is_section_scoped() {
        let text = r#"{"seller": {"name": "Shop", "gstin": "27AAPFU0939F1ZV"}, "buyer": {"name": "Client", "gstin": ""}, "items": [{"description": "Pen", "qty": "2"}, {"description": "Ink"}], "totals": {"grand_total": "59"}, oops"#;

        let invoice = GstInvoice::from_fallback(text);
        assert_eq!(invoice.seller.name, "Shop");
        assert_eq!(invoice.buyer.name, "Client");
        assert_eq!(invoice.buyer.gstin, "");
        assert_eq!(invoice.invoice_details, InvoiceDetails::default());
        assert_eq!(
            invoice.items,
            vec![
                LineItem {
                    description: "Pen".to_string(),
                    qty: "2".to_string(),
                    ..Default::default()
                },
                LineItem {
                    description: "Ink".to_string(),
                    ..Default::default()
                },
            ]
        );
        assert_eq!(invoice.totals.grand_total, "59");
    }

    #[test]
    fn test_validate_reports_gstin_problems() {
        let invoice = GstInvoice {
            seller: Seller {
                name: "Shop".to_string(),
                address: String::new(),
                gstin: "27AAPFU0939F1ZA".to_string(),
            },
            invoice_details: InvoiceDetails {
                number: "1".to_string(),
                date: String::new(),
            },
            items: vec![LineItem::default()],
            totals: Totals {
                grand_total: "10".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(invoice.validate(), vec!["Invalid seller GSTIN: 27AAPFU0939F1ZA".to_string()]);
    }

    #[test]
    fn test_validate_empty_invoice() {
        let issues = GstInvoice::default().validate();
        assert!(issues.contains(&"Missing seller GSTIN".to_string()));
        assert!(issues.contains(&"No line items".to_string()));
        assert_eq!(issues.len(), 5);
    }
}
