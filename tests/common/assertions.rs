//! Domain-specific assertion macros for pfrepair harnesses.
//!
//! Each macro checks one repair invariant over a document map and panics
//! with the offending path and the whole document when it is violated.

// ---------------------------------------------------------------------------
// Shape invariants
// ---------------------------------------------------------------------------

/// Assert that `system.traits.<key>` holds tag lists: `value` is an array of
/// non-blank strings, and so are `custom` / `customTotal` when they are
/// arrays or strings.
///
/// ```rust
/// assert_trait_list!(doc, "eres");
/// ```
#[macro_export]
macro_rules! assert_trait_list {
    ($doc:expr, $key:expr) => {{
        let doc: &serde_json::Map<String, serde_json::Value> = &$doc;
        let key: &str = $key;
        let entry = pfrepair_core::path::get(doc, &format!("system.traits.{key}"))
            .and_then(serde_json::Value::as_object)
            .unwrap_or_else(|| {
                panic!(
                    "assert_trait_list! failed: system.traits.{} is not an object\n  doc: {}",
                    key,
                    serde_json::Value::Object(doc.clone())
                )
            });
        for field in ["value", "custom", "customTotal"] {
            let Some(list) = entry.get(field) else {
                assert!(field != "value", "assert_trait_list! failed: traits.{key}.value missing");
                continue;
            };
            if field != "value" && !(list.is_array() || list.is_string()) {
                continue;
            }
            let ok = list
                .as_array()
                .is_some_and(|items| items.iter().all(|v| v.as_str().is_some_and(|s| !s.trim().is_empty())));
            if !ok {
                panic!(
                    "assert_trait_list! failed: traits.{}.{} = {}\n  doc: {}",
                    key,
                    field,
                    list,
                    serde_json::Value::Object(doc.clone())
                );
            }
        }
    }};
}

/// Assert that `system.traits.languages.value`, when an array, holds no nulls.
#[macro_export]
macro_rules! assert_no_language_nulls {
    ($doc:expr) => {{
        let doc: &serde_json::Map<String, serde_json::Value> = &$doc;
        if let Some(serde_json::Value::Array(langs)) =
            pfrepair_core::path::get(doc, "system.traits.languages.value")
        {
            if langs.iter().any(serde_json::Value::is_null) {
                panic!("assert_no_language_nulls! failed: {:?}", langs);
            }
        }
    }};
}

// ---------------------------------------------------------------------------
// Identifier invariants
// ---------------------------------------------------------------------------

/// Assert that non-blank item tags are pairwise distinct, and that every
/// non-blank action tag is distinct from all item tags and other actions.
#[macro_export]
macro_rules! assert_unique_tags {
    ($doc:expr) => {{
        let doc: &serde_json::Map<String, serde_json::Value> = &$doc;
        let mut seen = std::collections::HashMap::<String, String>::new();
        let items = doc.get("items").and_then(serde_json::Value::as_array).cloned().unwrap_or_default();
        for (i, item) in items.iter().enumerate() {
            let Some(item) = item.as_object() else { continue };
            if let Some(tag) = pfrepair_core::identifiers::item_tag(item) {
                if let Some(prev) = seen.insert(tag.to_string(), format!("items[{i}]")) {
                    panic!("assert_unique_tags! failed: tag {:?} on items[{}] and {}", tag, i, prev);
                }
            }
        }
        for (i, item) in items.iter().enumerate() {
            let actions = item
                .pointer("/system/actions")
                .and_then(serde_json::Value::as_array)
                .cloned()
                .unwrap_or_default();
            for (j, action) in actions.iter().enumerate() {
                let Some(tag) = action.get("tag").and_then(serde_json::Value::as_str) else { continue };
                let tag = tag.trim();
                if tag.is_empty() {
                    continue;
                }
                let here = format!("items[{i}].actions[{j}]");
                if let Some(prev) = seen.insert(tag.to_string(), here.clone()) {
                    panic!("assert_unique_tags! failed: tag {:?} on {} and {}", tag, here, prev);
                }
            }
        }
    }};
}

/// Assert that no `system.resources` key equals an item tag.
#[macro_export]
macro_rules! assert_resources_disjoint {
    ($doc:expr) => {{
        let doc: &serde_json::Map<String, serde_json::Value> = &$doc;
        if let Some(serde_json::Value::Object(resources)) =
            pfrepair_core::path::get(doc, "system.resources")
        {
            let items = doc.get("items").and_then(serde_json::Value::as_array).cloned().unwrap_or_default();
            for item in items.iter().filter_map(serde_json::Value::as_object) {
                if let Some(tag) = pfrepair_core::identifiers::item_tag(item) {
                    if resources.contains_key(tag) {
                        panic!(
                            "assert_resources_disjoint! failed: resource key {:?} shadows an item tag\n  resources: {:?}",
                            tag,
                            resources.keys().collect::<Vec<_>>()
                        );
                    }
                }
            }
        }
    }};
}
