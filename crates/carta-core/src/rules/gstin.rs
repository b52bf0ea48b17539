//! GSTIN (Indian GST Identification Number) validation.

use super::patterns::GSTIN_SHAPE;

const CHARSET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Uppercase the GSTIN and drop spaces and dashes.
pub fn format_gstin(gstin: &str) -> String {
    gstin
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Two-digit state code of a GSTIN, if well-formed.
pub fn gstin_state_code(gstin: &str) -> Option<u8> {
    let gstin = format_gstin(gstin);
    if !GSTIN_SHAPE.is_match(&gstin) {
        return None;
    }
    let code: u8 = gstin[..2].parse().ok()?;
    matches!(code, 1..=38 | 97 | 99).then_some(code)
}

/// Validate a GSTIN including its check character.
///
/// Format: 2-digit state code, 10-character PAN, entity number, `Z`,
/// and a base-36 check character over the first 14 characters with
/// weights alternating 1 and 2.
pub fn validate_gstin(gstin: &str) -> bool {
    let gstin = format_gstin(gstin);

    if gstin_state_code(&gstin).is_none() {
        return false;
    }

    let bytes = gstin.as_bytes();
    let sum: u32 = bytes[..14]
        .iter()
        .enumerate()
        .filter_map(|(i, b)| {
            let value = CHARSET.iter().position(|c| c == b)? as u32;
            let product = value * if i % 2 == 0 { 1 } else { 2 };
            Some(product / 36 + product % 36)
        })
        .sum();

    let check = ((36 - sum % 36) % 36) as usize;
    CHARSET[check] == bytes[14]
}
