//! Tool name sanitization.
//!
//! Tool names must match `^[A-Za-z0-9_-]{1,64}$`. User-supplied names are
//! coerced into that grammar rather than rejected.

use std::sync::LazyLock;

use regex::Regex;

/// Longest tool name clients accept.
pub const MAX_TOOL_NAME_LEN: usize = 64;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Map arbitrary text onto the tool name grammar.
///
/// Whitespace runs become `_`, other disallowed characters are dropped, and
/// the result is cut to 64 characters with any `_` left dangling by the cut
/// removed. Total and idempotent; may return an empty string.
pub fn sanitize_tool_name(raw: &str) -> String {
    let spaced = WHITESPACE.replace_all(raw, "_");
    let cleaned = DISALLOWED.replace_all(&spaced, "");

    // Only ASCII survives the filter, so byte and char lengths agree.
    if cleaned.len() <= MAX_TOOL_NAME_LEN {
        return cleaned.into_owned();
    }
    cleaned[..MAX_TOOL_NAME_LEN].trim_end_matches('_').to_string()
}

/// Whether `name` already satisfies the grammar.
pub fn is_valid_tool_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_TOOL_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
