//! Output formatting for scanned records.

use carta_core::models::card::BUSINESS_CARD_FIELDS;
use carta_core::{BusinessCard, GstInvoice, LineItem, ScanKind, ScanRecord};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn render(record: &ScanRecord, format: OutputFormat) -> anyhow::Result<String> {
    match (format, record) {
        (OutputFormat::Json, _) => Ok(serde_json::to_string_pretty(record)?),
        (OutputFormat::Csv, ScanRecord::BusinessCard(card)) => card_csv(card),
        (OutputFormat::Csv, ScanRecord::Invoice(invoice)) => invoice_csv(invoice),
        (OutputFormat::Text, ScanRecord::BusinessCard(card)) => Ok(card_text(card)),
        (OutputFormat::Text, ScanRecord::Invoice(invoice)) => Ok(invoice_text(invoice)),
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}

fn card_csv(card: &BusinessCard) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(BUSINESS_CARD_FIELDS.fields)?;
    wtr.write_record([
        &card.company_name,
        &card.phone_number,
        &card.email,
        &card.contact_person_name,
        &card.website_url,
        &card.address,
    ])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// One row per line item, invoice columns repeated on each row.
fn invoice_csv(invoice: &GstInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "date",
        "seller_name",
        "seller_gstin",
        "buyer_name",
        "buyer_gstin",
        "description",
        "hsn",
        "qty",
        "rate",
        "tax_amount",
        "amount",
        "taxable",
        "tax",
        "grand_total",
    ])?;

    let empty = LineItem::default();
    let items: Vec<_> = if invoice.items.is_empty() {
        vec![&empty]
    } else {
        invoice.items.iter().collect()
    };

    for item in items {
        wtr.write_record([
            &invoice.invoice_details.number,
            &invoice.invoice_details.date,
            &invoice.seller.name,
            &invoice.seller.gstin,
            &invoice.buyer.name,
            &invoice.buyer.gstin,
            &item.description,
            &item.hsn,
            &item.qty,
            &item.rate,
            &item.tax_amount,
            &item.amount,
            &invoice.totals.taxable,
            &invoice.totals.tax,
            &invoice.totals.grand_total,
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn card_text(card: &BusinessCard) -> String {
    let rows = [
        ("Company Name", &card.company_name),
        ("Contact Person", &card.contact_person_name),
        ("Address", &card.address),
        ("Website", &card.website_url),
        ("Email", &card.email),
        ("Phone Number", &card.phone_number),
    ];

    let mut output = String::new();
    for (label, value) in rows {
        output.push_str(&format!("{:<15} {}\n", format!("{label}:"), or_na(value)));
    }
    output
}

fn invoice_text(invoice: &GstInvoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice #: {}\n", or_na(&invoice.invoice_details.number)));
    output.push_str(&format!("Date: {}\n", or_na(&invoice.invoice_details.date)));
    output.push('\n');

    output.push_str("Seller (From):\n");
    output.push_str(&format!("  {}\n", or_na(&invoice.seller.name)));
    output.push_str(&format!("  {}\n", or_na(&invoice.seller.address)));
    output.push_str(&format!("  GSTIN: {}\n", or_na(&invoice.seller.gstin)));
    output.push('\n');

    output.push_str("Buyer (To):\n");
    let buyer = if invoice.buyer.name.is_empty() {
        "Cash/General"
    } else {
        invoice.buyer.name.as_str()
    };
    output.push_str(&format!("  {}\n", buyer));
    output.push_str(&format!("  Billing: {}\n", or_na(&invoice.buyer.billing_address)));
    output.push_str(&format!("  Shipping: {}\n", or_na(&invoice.buyer.shipping_address)));
    output.push_str(&format!("  GSTIN: {}\n", or_na(&invoice.buyer.gstin)));
    output.push('\n');

    output.push_str("Items:\n");
    if invoice.items.is_empty() {
        output.push_str("  (none)\n");
    }
    for (i, item) in invoice.items.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} [HSN/SAC {}] qty {} @ {}, tax {}, total {}\n",
            i + 1,
            or_na(&item.description),
            or_na(&item.hsn),
            or_na(&item.qty),
            or_na(&item.rate),
            or_na(&item.tax_amount),
            or_na(&item.amount),
        ));
    }
    output.push('\n');

    output.push_str("Totals:\n");
    output.push_str(&format!("  Taxable Value: {}\n", or_na(&invoice.totals.taxable)));
    output.push_str(&format!("  Total Tax:     {}\n", or_na(&invoice.totals.tax)));
    output.push_str(&format!("  Grand Total:   {}\n", or_na(&invoice.totals.grand_total)));

    output
}

/// Header of the batch summary for a scan kind.
pub fn summary_header(kind: ScanKind) -> Vec<&'static str> {
    let fields: &[&str] = match kind {
        ScanKind::BusinessCard => &["company_name", "contact_person_name", "email", "phone_number"],
        ScanKind::Invoice => &["invoice_number", "date", "seller_name", "seller_gstin", "grand_total"],
    };

    let mut header = vec!["filename", "status", "outcome"];
    header.extend_from_slice(fields);
    header.extend_from_slice(&["warnings", "processing_time_ms", "error"]);
    header
}

/// Key columns of a record for the batch summary.
pub fn summary_fields(record: &ScanRecord) -> Vec<String> {
    match record {
        ScanRecord::BusinessCard(card) => vec![
            card.company_name.clone(),
            card.contact_person_name.clone(),
            card.email.clone(),
            card.phone_number.clone(),
        ],
        ScanRecord::Invoice(invoice) => vec![
            invoice.invoice_details.number.clone(),
            invoice.invoice_details.date.clone(),
            invoice.seller.name.clone(),
            invoice.seller.gstin.clone(),
            invoice.totals.grand_total.clone(),
        ],
    }
}
