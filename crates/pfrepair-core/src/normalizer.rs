//! Shape normalizer. Repairs field shapes that crash the character sheet.
//!
//! Rules run in a fixed order, each on the output of the previous one:
//!
//! 1. Targeting: only documents whose `type` is configured (character, npc
//!    by default) get trait repair. Every document gets rule 4.
//! 2. Trait entries under `system.traits.<key>`: `value`, `custom` and
//!    `customTotal` become arrays of non-blank strings.
//! 3. `system.traits.languages.value` loses its `null` entries.
//! 4. Plus-number strings (`"+2"`) anywhere in the document become integers,
//!    except inside the configured trait tag lists of a targeted document.
//!    Values past `u64::MAX` stay strings.
//!
//! A document without a `system.traits` object skips rules 2 and 3 entirely;
//! trait keys are only synthesized inside an existing traits object.

use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::LazyLock;

use crate::changelog::ChangeLog;
use crate::config::NormalizerConfig;
use crate::lists::{clean_tag_list, tokens_to_values};
use crate::path;
use crate::types::doc_type;
use crate::walk::{rewrite_scalars, JsonPath, Segment};

static PLUS_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+([0-9]+)$").expect("plus-number regex is valid"));

/// Fields of a trait entry that must hold tag lists.
const OPTIONAL_LIST_FIELDS: [&str; 2] = ["custom", "customTotal"];

/// Repairs trait-list shapes and plus-number strings in one document.
#[derive(Debug, Clone)]
pub struct ShapeNormalizer {
    target_types: Vec<String>,
    trait_keys: Vec<String>,
}

impl Default for ShapeNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

impl ShapeNormalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            target_types: config.target_types.clone(),
            trait_keys: config.trait_keys.clone(),
        }
    }

    pub fn trait_keys(&self) -> &[String] {
        &self.trait_keys
    }

    /// Whether `doc` gets trait repair (rule 1).
    pub fn is_targeted(&self, doc: &Map<String, Value>) -> bool {
        doc_type(doc).is_some_and(|t| self.target_types.iter().any(|x| x == t))
    }

    /// Apply all rules to `doc`, appending a description of every change to
    /// `log`. Returns whether this call mutated the document.
    pub fn normalize(&self, doc: &mut Map<String, Value>, log: &mut ChangeLog) -> bool {
        let mark = log.mark();
        let targeted = self.is_targeted(doc);

        if targeted {
            if let Some(Value::Object(traits)) = path::get_mut(doc, "system.traits") {
                for key in &self.trait_keys {
                    repair_trait_entry(traits, key, log);
                }
                purge_language_nulls(traits, log);
            }
        }

        self.convert_plus_numbers(doc, targeted, log);

        log.changed_since(mark)
    }

    /// Rule 4. In targeted documents the repaired trait tag lists are left
    /// alone: their elements must stay strings.
    fn convert_plus_numbers(&self, doc: &mut Map<String, Value>, targeted: bool, log: &mut ChangeLog) {
        // Walk each top-level field so paths read `system.x` rather than `$.system.x`.
        for (key, child) in doc.iter_mut() {
            let mut transform = |rel: &JsonPath, value: &Value| -> Option<Value> {
                if targeted && self.is_trait_list_path(key, rel) {
                    return None;
                }
                let Value::String(s) = value else { return None };
                let n = parse_plus_number(s)?;
                log.record(format!("plus-number: {} {:?} -> {n}", display_path(key, rel), s));
                Some(Value::Number(Number::from(n)))
            };
            rewrite_scalars(child, &mut transform);
        }
    }

    /// `system.traits.<configured key>.{value,custom,customTotal}[i]`, with
    /// `rel` relative to the top-level field `top`.
    fn is_trait_list_path(&self, top: &str, rel: &JsonPath) -> bool {
        if top != "system" || !rel.starts_with_keys(&["traits"]) {
            return false;
        }
        if !matches!(rel.segments(), [_, _, _, Segment::Index(_)]) {
            return false;
        }
        let (Some(trait_key), Some(field)) = (rel.key_at(1), rel.key_at(2)) else {
            return false;
        };
        (field == "value" || OPTIONAL_LIST_FIELDS.contains(&field))
            && self.trait_keys.iter().any(|k| k == trait_key)
    }
}

fn display_path(top: &str, rel: &JsonPath) -> String {
    if rel.segments().is_empty() {
        top.to_string()
    } else if rel.to_string().starts_with('[') {
        format!("{top}{rel}")
    } else {
        format!("{top}.{rel}")
    }
}

/// `"+12"` → `Some(12)`. Surrounding whitespace is ignored; anything else
/// (signs, decimals, inner spaces) is not a plus-number.
pub fn parse_plus_number(s: &str) -> Option<u64> {
    let caps = PLUS_NUMBER.captures(s.trim())?;
    match caps[1].parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(value = s, "plus-number out of range; left as string");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Trait entries
// ---------------------------------------------------------------------------

/// Rule 2 for one trait key.
fn repair_trait_entry(traits: &mut Map<String, Value>, key: &str, log: &mut ChangeLog) {
    let slot = traits.entry(key).or_insert(Value::Null);
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
        log.record(format!("traits.{key}: created object"));
    }
    let Value::Object(entry) = slot else { return };

    let value_fix = match entry.get("value") {
        None | Some(Value::Null) => Some((Vec::new(), "missing -> []".to_string())),
        Some(v @ (Value::String(_) | Value::Array(_))) => list_fix(v),
        Some(_) => Some((Vec::new(), "invalid type -> []".to_string())),
    };
    if let Some((list, msg)) = value_fix {
        entry.insert("value".to_string(), Value::Array(list));
        log.record(format!("traits.{key}.value: {msg}"));
    }

    for field in OPTIONAL_LIST_FIELDS {
        if let Some((list, msg)) = entry.get(field).and_then(list_fix) {
            entry.insert(field.to_string(), Value::Array(list));
            log.record(format!("traits.{key}.{field}: {msg}"));
        }
    }
}

/// Replacement for a string or array tag field, with the change description.
/// `None` when the field is already a clean list or is some other type.
fn list_fix(current: &Value) -> Option<(Vec<Value>, String)> {
    match current {
        Value::String(s) => {
            let list = tokens_to_values(s);
            let msg = format!("str -> list ({} item(s))", list.len());
            Some((list, msg))
        }
        Value::Array(items) => clean_tag_list(items).map(|cleaned| {
            let msg = format!("cleaned list (dropped {})", items.len() - cleaned.len());
            (cleaned, msg)
        }),
        _ => None,
    }
}

/// Rule 3. Only nulls are removed here; blank strings are rule 2's business.
fn purge_language_nulls(traits: &mut Map<String, Value>, log: &mut ChangeLog) {
    let Some(Value::Array(langs)) = path::get_mut(traits, "languages.value") else {
        return;
    };
    let before = langs.len();
    langs.retain(|v| !v.is_null());
    let removed = before - langs.len();
    if removed > 0 {
        log.record(format!("languages.value: removed {removed} null(s)"));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
