//! Helpers for mining structured data out of free-text gateway replies.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```(?:json)?\s*").expect("valid fence pattern"))
}

fn object_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid object pattern"))
}

/// Drop Markdown code fences (```json ... ```) and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").trim().to_string()
}

/// Outermost `{ ... }` span of the reply, from the first `{` to the last `}`.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    object_pattern().find(raw).map(|found| found.as_str())
}

/// Parse a reply that is expected to be a (possibly fenced) JSON document.
pub fn parse_fenced<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(&strip_code_fences(raw))
}

/// Truncate to at most `limit` characters without splitting a code point.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
