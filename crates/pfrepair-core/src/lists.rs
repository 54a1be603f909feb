//! Trait tag lists: the shared tokenizer and the list filter.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,]+").expect("separator regex is valid"));

/// Split `"fire; cold,,acid"` into `["fire", "cold", "acid"]`.
///
/// Splits on runs of `,` and `;`, trims every token and drops the empty ones.
pub fn split_tokens(s: &str) -> Vec<String> {
    SEPARATORS
        .split(s)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// [`split_tokens`] packaged as JSON string values.
pub fn tokens_to_values(s: &str) -> Vec<Value> {
    split_tokens(s).into_iter().map(Value::String).collect()
}

/// A valid trait tag: a string with at least one non-whitespace character.
pub fn is_tag(value: &Value) -> bool {
    matches!(value, Value::String(s) if !s.trim().is_empty())
}

/// Drop every element that is not a valid tag.
///
/// Returns `None` when nothing would be dropped, so callers only rewrite
/// lists that actually change. Surviving tags are kept verbatim.
pub fn clean_tag_list(items: &[Value]) -> Option<Vec<Value>> {
    if items.iter().all(is_tag) {
        return None;
    }
    Some(items.iter().filter(|v| is_tag(v)).cloned().collect())
}
