//! Regex patterns used by the response repair pipeline.

use std::collections::HashMap;
use std::sync::RwLock;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Markdown fence markers, with or without the `json` tag
    pub static ref CODE_FENCE: Regex = Regex::new(r"```json|```").unwrap();

    // Leftmost `{` through rightmost `}`
    pub static ref OBJECT_SPAN: Regex = Regex::new(r"\{[\s\S]*\}").unwrap();

    // Bare key directly before a colon (ASCII word characters only)
    pub static ref UNQUOTED_KEY: Regex = Regex::new(r"([A-Za-z0-9_]+):").unwrap();

    // Unquoted scalar between a colon and the next `,`, `]` or `}`
    pub static ref UNQUOTED_VALUE: Regex = Regex::new(
        r#":\s*([^",\[\]\{\}][^",\[\]\{\}]*?)([,\]\}])"#
    ).unwrap();

    // `{ ... }` without nested braces
    pub static ref FLAT_OBJECT: Regex = Regex::new(r"\{([^{}]*)\}").unwrap();

    // Per-name patterns, compiled on first use
    static ref FIELD_PATTERNS: RwLock<HashMap<String, Regex>> = RwLock::new(HashMap::new());
    static ref SECTION_PATTERNS: RwLock<HashMap<String, Regex>> = RwLock::new(HashMap::new());
    static ref ARRAY_PATTERNS: RwLock<HashMap<String, Regex>> = RwLock::new(HashMap::new());
}

/// Pattern matching `"<field>": "<value>"`, case-insensitive on the field name.
pub fn field_pattern(field: &str) -> Option<Regex> {
    cached(&FIELD_PATTERNS, field, |name| {
        format!(r#"(?i)"{}"\s*:\s*"([^"]*)""#, regex::escape(name))
    })
}

/// Pattern matching the body of `"<section>": { ... }` (no nested braces).
pub fn section_pattern(section: &str) -> Option<Regex> {
    cached(&SECTION_PATTERNS, section, |name| {
        format!(r#"(?i)"{}"\s*:\s*\{{([^{{}}]*)\}}"#, regex::escape(name))
    })
}

/// Pattern matching the body of `"<key>": [ ... ]` (no nested brackets).
pub fn array_pattern(key: &str) -> Option<Regex> {
    cached(&ARRAY_PATTERNS, key, |name| {
        format!(r#"(?i)"{}"\s*:\s*\[([^\[\]]*)\]"#, regex::escape(name))
    })
}

// `Regex` clones share the compiled program.
fn cached(
    cache: &RwLock<HashMap<String, Regex>>,
    name: &str,
    source: impl FnOnce(&str) -> String,
) -> Option<Regex> {
    if let Some(re) = cache.read().ok().and_then(|map| map.get(name).cloned()) {
        return Some(re);
    }

    let re = Regex::new(&source(name)).ok()?;
    if let Ok(mut map) = cache.write() {
        map.entry(name.to_string()).or_insert_with(|| re.clone());
    }
    Some(re)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_pattern_is_case_insensitive() {
        let re = field_pattern("email").unwrap();
        let caps = re.captures(r#"{"EMAIL" :  "a@b.com"}"#).unwrap();
        assert_eq!(&caps[1], "a@b.com");
    }

    #[test]
    fn test_section_pattern_captures_body() {
        let re = section_pattern("seller").unwrap();
        let caps = re.captures(r#"{"seller": {"name": "A"}, "buyer": {}}"#).unwrap();
        assert_eq!(&caps[1], r#""name": "A""#);
    }

    #[test]
    fn test_array_pattern_captures_body() {
        let re = array_pattern("items").unwrap();
        let caps = re.captures(r#""items": [{"hsn": "1"}, {"hsn": "2"}]"#).unwrap();
        assert_eq!(&caps[1], r#"{"hsn": "1"}, {"hsn": "2"}"#);
    }

    #[test]
    fn test_named_patterns_compile_once() {
        let first = field_pattern("gstin_cache_check").unwrap();
        let second = field_pattern("GSTIN_cache_check").unwrap();
        assert_ne!(first.as_str(), second.as_str());
        let again = field_pattern("gstin_cache_check").unwrap();
        assert_eq!(first.as_str(), again.as_str());

        let map = FIELD_PATTERNS.read().unwrap();
        assert!(map.contains_key("gstin_cache_check"));
        assert!(map.contains_key("GSTIN_cache_check"));
        drop(map);

        section_pattern("seller_cache_check").unwrap();
        array_pattern("items_cache_check").unwrap();
        assert!(SECTION_PATTERNS.read().unwrap().contains_key("seller_cache_check"));
        assert!(ARRAY_PATTERNS.read().unwrap().contains_key("items_cache_check"));
    }

    #[test]
    fn test_object_span_is_greedy() {
        let m = OBJECT_SPAN.find("a {x} b {y} c").unwrap();
        assert_eq!(m.as_str(), "{x} b {y}");
    }
}
