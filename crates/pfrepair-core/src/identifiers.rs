//! Identifier deduplicator. Makes item and action tags unique inside an
//! actor and drops resource keys that shadow item tags.
//!
//! Three passes share one set of claimed identifiers:
//!
//! 1. Item tags, in item order. The first holder of a tag keeps it; later
//!    holders become `<tag>_<item _id>` (then `_2`, `_3`, … if that is
//!    taken) and get `useCustomTag: true`.
//! 2. Action tags, item by item, action by action. An action tag that is
//!    already claimed becomes `<tag>_act_<action _id>` (same fallback
//!    counter); otherwise it is claimed as-is.
//! 3. Every `system.resources` key equal to a final item tag is deleted.
//!    The sheet rebuilds those resources from the item tags.
//!
//! Renaming depends only on document order, so a repaired actor passes
//! through a second run unchanged.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::changelog::ChangeLog;
use crate::config::IdentifiersConfig;
use crate::path::{self, non_blank_str, non_empty_str};
use crate::types::{display_value, is_actor};

/// Resolves tag collisions inside actor documents.
#[derive(Debug, Clone)]
pub struct IdentifierDeduplicator {
    missing_item_id: String,
    missing_action_id: String,
}

impl Default for IdentifierDeduplicator {
    fn default() -> Self {
        Self::new(&IdentifiersConfig::default())
    }
}

impl IdentifierDeduplicator {
    pub fn new(config: &IdentifiersConfig) -> Self {
        Self {
            missing_item_id: config.missing_item_id.clone(),
            missing_action_id: config.missing_action_id.clone(),
        }
    }

    /// Only character/NPC documents with an `items` array are deduplicated.
    pub fn applies_to(&self, doc: &Map<String, Value>) -> bool {
        is_actor(doc)
    }

    /// Run all three passes over `doc`. Returns whether this call mutated it.
    pub fn deduplicate(&self, doc: &mut Map<String, Value>, log: &mut ChangeLog) -> bool {
        if !self.applies_to(doc) {
            return false;
        }
        let mark = log.mark();
        let mut claimed = HashSet::new();
        let mut item_tags = HashSet::new();

        if let Some(Value::Array(items)) = doc.get_mut("items") {
            self.unique_item_tags(items, &mut claimed, &mut item_tags, log);
            self.unique_action_tags(items, &mut claimed, log);
        }
        drop_shadowed_resources(doc, &item_tags, log);

        log.changed_since(mark)
    }

    fn unique_item_tags(
        &self,
        items: &mut [Value],
        claimed: &mut HashSet<String>,
        item_tags: &mut HashSet<String>,
        log: &mut ChangeLog,
    ) {
        for item in items.iter_mut() {
            let Value::Object(item) = item else { continue };
            let Some(tag) = item_tag(item).map(String::from) else {
                continue;
            };

            if claimed.insert(tag.clone()) {
                item_tags.insert(tag);
                continue;
            }

            let item_id = non_empty_str(item.get("_id"))
                .unwrap_or(self.missing_item_id.as_str())
                .to_string();
            let new_tag = unique_tag(&tag, &format!("_{item_id}"), claimed);
            set_item_tag(item, &new_tag);
            claimed.insert(new_tag.clone());
            item_tags.insert(new_tag.clone());

            log.record(format!(
                "item {} ({item_id}): tag {tag:?} -> {new_tag:?}",
                display_value(item.get("name"))
            ));
        }
    }

    fn unique_action_tags(&self, items: &mut [Value], claimed: &mut HashSet<String>, log: &mut ChangeLog) {
        for item in items.iter_mut() {
            let Value::Object(item) = item else { continue };
            let item_name = display_value(item.get("name"));
            let Some(Value::Array(actions)) = path::get_mut(item, "system.actions") else {
                continue;
            };

            for action in actions.iter_mut() {
                let Value::Object(action) = action else { continue };
                let Some(tag) = non_blank_str(action.get("tag")).map(String::from) else {
                    continue;
                };

                if !claimed.contains(&tag) {
                    claimed.insert(tag);
                    continue;
                }

                let action_id = non_empty_str(action.get("_id"))
                    .unwrap_or(self.missing_action_id.as_str())
                    .to_string();
                let new_tag = unique_tag(&tag, &format!("_act_{action_id}"), claimed);
                action.insert("tag".to_string(), Value::String(new_tag.clone()));
                claimed.insert(new_tag.clone());

                log.record(format!("action tag on item {item_name}: {tag:?} -> {new_tag:?}"));
            }
        }
    }
}

/// Pass 3.
fn drop_shadowed_resources(doc: &mut Map<String, Value>, item_tags: &HashSet<String>, log: &mut ChangeLog) {
    let Some(Value::Object(resources)) = path::get_mut(doc, "system.resources") else {
        return;
    };
    let shadowed: Vec<String> = resources
        .keys()
        .filter(|k| item_tags.contains(k.as_str()))
        .cloned()
        .collect();
    if shadowed.is_empty() {
        return;
    }
    resources.retain(|k, _| !item_tags.contains(k.as_str()));
    for key in shadowed {
        log.record(format!("resources: removed duplicate key {key:?} (rebuilt from item tag)"));
    }
}

/// An item's `system.tag`, trimmed, if it is a non-blank string.
pub fn item_tag(item: &Map<String, Value>) -> Option<&str> {
    non_blank_str(path::get(item, "system.tag"))
}

fn set_item_tag(item: &mut Map<String, Value>, tag: &str) {
    let system = path::ensure_object(item, "system");
    system.insert("tag".to_string(), Value::String(tag.to_string()));
    system.insert("useCustomTag".to_string(), Value::Bool(true));
}

/// `base + suffix`, or `base + suffix + "_N"` for the smallest `N >= 2`
/// that is not yet claimed.
pub fn unique_tag(base: &str, suffix: &str, claimed: &HashSet<String>) -> String {
    let candidate = format!("{base}{suffix}");
    if !claimed.contains(&candidate) {
        return candidate;
    }
    let mut i = 2u32;
    loop {
        let next = format!("{candidate}_{i}");
        if !claimed.contains(&next) {
            return next;
        }
        i += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
