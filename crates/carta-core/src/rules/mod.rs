//! Advisory checks on extracted values.
//!
//! Nothing here changes a record; callers decide what to do with the result.

pub mod gstin;
pub mod patterns;

pub use gstin::{format_gstin, gstin_state_code, validate_gstin};
pub use patterns::*;

/// Loose shape check for an email address.
pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("x@acme.com"));
        assert!(validate_email(" info@shop.co.in "));
        assert!(!validate_email("x@acme"));
        assert!(!validate_email("acme.com"));
        assert!(!validate_email(""));
    }
}
