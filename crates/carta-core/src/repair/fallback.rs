//! Field-by-field recovery used when the structural parse fails.
//!
//! Every lookup is an independent regex scan over the coerced candidate
//! text. Values are taken verbatim: escapes are not decoded and a value
//! stops at the first `"`, escaped or not.

use super::patterns::{FLAT_OBJECT, array_pattern, field_pattern, section_pattern};

/// Value of the first `"<field>": "<value>"` pair, field name matched
/// case-insensitively.
pub fn find_field(text: &str, field: &str) -> Option<String> {
    let re = field_pattern(field)?;
    re.captures(text).map(|caps| caps[1].to_string())
}

/// Body of the first `"<section>": { ... }` without nested braces.
pub fn find_section<'a>(text: &'a str, section: &str) -> Option<&'a str> {
    let re = section_pattern(section)?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Bodies of the flat `{ ... }` objects inside `"<key>": [ ... ]`.
pub fn find_array_objects<'a>(text: &'a str, key: &str) -> Vec<&'a str> {
    let Some(re) = array_pattern(key) else {
        return Vec::new();
    };
    let Some(body) = re.captures(text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    FLAT_OBJECT
        .captures_iter(body.as_str())
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_field_in_broken_json() {
        let text = r#"{"email": "a@b.com", "address": 12 Main St "oops"}"#;
        assert_eq!(find_field(text, "email"), Some("a@b.com".to_string()));
        assert_eq!(find_field(text, "address"), None);
    }

    #[test]
    fn test_find_field_takes_first_match() {
        let text = r#""email": "first@b.com", "email": "second@b.com""#;
        assert_eq!(find_field(text, "email"), Some("first@b.com".to_string()));
    }

    #[test]
    fn test_find_field_stops_at_escaped_quote() {
        let text = r#"{"company_name": "Acme \"Best\" Ltd""#;
        assert_eq!(find_field(text, "company_name"), Some("Acme \\".to_string()));
    }

    #[test]
    fn test_find_field_escapes_field_name() {
        assert_eq!(find_field(r#""a.b": "x""#, "a.b"), Some("x".to_string()));
        assert_eq!(find_field(r#""aXb": "x""#, "a.b"), None);
    }

    #[test]
    fn test_find_section_and_items() {
        let text = r#"{"seller": {"name": "Shop", "gstin": "X"}, "items": [{"hsn": "1"}, {"hsn": "2"}], broken"#;
        assert_eq!(find_section(text, "seller"), Some(r#""name": "Shop", "gstin": "X""#));
        assert_eq!(find_array_objects(text, "items"), vec![r#""hsn": "1""#, r#""hsn": "2""#]);
        assert!(find_section(text, "buyer").is_none());
        assert!(find_array_objects(text, "lines").is_empty());
    }
}
