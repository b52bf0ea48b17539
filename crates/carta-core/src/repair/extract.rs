//! Candidate-object extraction.

use super::patterns::OBJECT_SPAN;

/// Return the span from the first `{` to the last `}` after it.
///
/// Falls back to the whole input when there is no such span, in which case
/// the structural parse is expected to fail. Greedy on purpose: two separate
/// objects, or braces in prose after the object, end up in one candidate.
pub fn extract_candidate(normalized: &str) -> &str {
    OBJECT_SPAN
        .find(normalized)
        .map(|m| m.as_str())
        .unwrap_or(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discards_surrounding_prose() {
        assert_eq!(
            extract_candidate("Here you go: {\"a\": \"b\"} Hope this helps!"),
            "{\"a\": \"b\"}"
        );
    }

    #[test]
    fn test_no_braces_returns_input() {
        assert_eq!(extract_candidate("no object here"), "no object here");
    }

    #[test]
    fn test_closing_brace_before_opening_returns_input() {
        assert_eq!(extract_candidate("} then {"), "} then {");
    }

    #[test]
    fn test_greedy_span_covers_trailing_braces() {
        assert_eq!(
            extract_candidate("{\"a\": \"b\"} and {\"c\": \"d\"}"),
            "{\"a\": \"b\"} and {\"c\": \"d\"}"
        );
    }
}
