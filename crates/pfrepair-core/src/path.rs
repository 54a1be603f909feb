//! Dotted-path access into JSON objects.
//!
//! Every lookup checks that each intermediate node is an object before
//! descending, so a malformed sub-structure yields `None` instead of a panic.

use serde_json::{Map, Value};

/// Look up `a.b.c` under `root`.
pub fn get<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut cur = root.get(parts.next()?)?;
    for part in parts {
        cur = cur.as_object()?.get(part)?;
    }
    Some(cur)
}

/// Mutable variant of [`get`].
pub fn get_mut<'a>(root: &'a mut Map<String, Value>, path: &str) -> Option<&'a mut Value> {
    let mut parts = path.split('.');
    let mut cur = root.get_mut(parts.next()?)?;
    for part in parts {
        cur = cur.as_object_mut()?.get_mut(part)?;
    }
    Some(cur)
}

/// Walk `a.b.c` under `root`, replacing any missing or non-object node with
/// an empty object, and return the object at the end of the path.
pub fn ensure_object<'a>(root: &'a mut Map<String, Value>, path: &str) -> &'a mut Map<String, Value> {
    let mut cur = root;
    for part in path.split('.') {
        let slot = cur
            .entry(part)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            unreachable!("slot was just made an object")
        };
        cur = next;
    }
    cur
}

/// The string at `value`, trimmed, if it is a non-blank string.
pub fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim()),
        _ => None,
    }
}

/// The string at `value`, untrimmed, if it is a non-empty string.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}
