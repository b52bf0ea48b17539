//! Regex patterns for value checks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // local@domain.tld
    pub static ref EMAIL: Regex = Regex::new(
        r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$"
    ).unwrap();

    // 2-digit state code, 10-char PAN, entity number, 'Z', check character
    pub static ref GSTIN_SHAPE: Regex = Regex::new(
        r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$"
    ).unwrap();
}
