//! Syntax coercion for almost-JSON.
//!
//! Two regex rewrites, applied in order: quote bare keys, then quote bare
//! scalar values. They are heuristics and do not understand JSON strings,
//! so colons inside quoted values are rewritten too.

use super::patterns::{UNQUOTED_KEY, UNQUOTED_VALUE};

/// Apply both rewrites to a candidate span.
pub fn coerce(candidate: &str) -> String {
    let keyed = quote_keys(candidate);
    quote_values(&keyed)
}

/// `key:` becomes `"key":`.
pub fn quote_keys(text: &str) -> String {
    UNQUOTED_KEY.replace_all(text, r#""${1}":"#).into_owned()
}

/// `: value,` becomes `: "value",` (also before `]` and `}`).
pub fn quote_values(text: &str) -> String {
    UNQUOTED_VALUE.replace_all(text, r#": "${1}"${2}"#).into_owned()
}
