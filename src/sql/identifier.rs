//! Identifier whitelisting. Field names, table aliases and transform functions come from
//! config and are interpolated into SQL text, so nothing reaches a statement unless it passes here.

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// SQL functions that may wrap a column in filter, search and sort expressions.
pub const ALLOWED_TRANSFORMS: &[&str] = &["LOWER", "UPPER", "TRIM", "LTRIM", "RTRIM", "DATE", "UNACCENT"];

/// Longest accepted free-text filter or search value, in characters.
pub const MAX_FILTER_VALUE_LEN: usize = 255;

/// Bare column name or table alias: no dots, whitespace or punctuation.
pub fn is_valid_field_name(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Must look like an identifier and be on the allow-list (case-insensitive).
pub fn is_valid_transform_function(s: &str) -> bool {
    is_valid_field_name(s) && ALLOWED_TRANSFORMS.iter().any(|f| f.eq_ignore_ascii_case(s))
}

/// Free-text value accepted from a client: bounded length, no control characters.
pub fn is_valid_string(s: &str) -> bool {
    s.chars().count() <= MAX_FILTER_VALUE_LEN && !s.chars().any(char::is_control)
}

/// Coarse check on caller-supplied SELECT / COUNT statements: a single SELECT with no
/// statement terminator and no comment markers.
pub fn is_valid_query_string(query: &str) -> bool {
    let trimmed = query.trim();
    let starts_with_select = trimmed
        .get(..6)
        .map(|head| head.eq_ignore_ascii_case("select"))
        .unwrap_or(false);
    starts_with_select && !trimmed.contains(';') && !trimmed.contains("--") && !trimmed.contains("/*")
}
