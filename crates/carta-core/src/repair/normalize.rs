//! Response normalization: the text-level cleanup done before any parsing.

use super::patterns::CODE_FENCE;

/// Normalize a raw model response.
///
/// Steps run in a fixed order, each feeding the next:
/// 1. strip code-fence markers
/// 2. trim surrounding whitespace
/// 3. drop C0/C1 control characters
/// 4. escape newline, carriage return and tab
///
/// Step 3 removes U+000A, U+000D and U+0009, so step 4 has nothing left to
/// escape in text that went through step 3.
pub fn normalize(raw: &str) -> String {
    let text = strip_code_fences(raw);
    let text = remove_control_chars(trim_whitespace(&text));
    escape_line_breaks(&text)
}

/// Remove every "```json" and "```" marker.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

/// Trim Unicode whitespace and byte-order marks from both ends.
pub fn trim_whitespace(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Drop U+0000..=U+001F and U+007F..=U+009F.
pub fn remove_control_chars(text: &str) -> String {
    text.chars().filter(|c| !is_control(*c)).collect()
}

/// Replace literal `\n`, `\r` and `\t` with their two-character escapes.
pub fn escape_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn is_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}
