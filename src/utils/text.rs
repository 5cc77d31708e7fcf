// Text utils

use once_cell::sync::Lazy;
use regex::Regex;

/// Control characters spreadsheet cells cannot hold. Tab, line feed and
/// carriage return are allowed.
static ILLEGAL_CELL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f]").unwrap());

/// Replaces each illegal control character with a space.
pub fn sanitize_cell(value: &str) -> String {
    ILLEGAL_CELL_CHARS.replace_all(value, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_become_spaces() {
        assert_eq!(sanitize_cell("a\u{0}b\u{7}c\u{1f}d"), "a b c d");
        assert_eq!(sanitize_cell("keep\ttab\nand\rcr"), "keep\ttab\nand\rcr");
        assert_eq!(sanitize_cell("₹ 50,000"), "₹ 50,000");
    }
}
