//! Test builders for actor documents and their embedded items.
//!
//! These builders are for readable test setup, not production use. They
//! panic on invalid input rather than returning `Result`.

use serde_json::{json, Map, Value};

/// Unwrap a `json!` object literal into a document map.
pub fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// ActorBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for actor documents.
///
/// # Example
///
/// ```rust
/// let doc = ActorBuilder::npc("Goblin")
///     .trait_entry("eres", json!({"value": "fire; cold"}))
///     .item(ItemBuilder::new("abc123", "Bite").tag("bite"))
///     .resource("bite")
///     .build();
/// ```
pub struct ActorBuilder {
    doc: Map<String, Value>,
}

impl ActorBuilder {
    pub fn of_type(doc_type: &str, name: &str) -> Self {
        let doc = obj(json!({
            "_id": format!("actor-{}", name.to_lowercase().replace(' ', "-")),
            "name": name,
            "type": doc_type,
            "system": {},
            "items": [],
        }));
        Self { doc }
    }

    pub fn npc(name: &str) -> Self {
        Self::of_type("npc", name)
    }

    pub fn character(name: &str) -> Self {
        Self::of_type("character", name)
    }

    pub fn id(mut self, id: &str) -> Self {
        self.doc.insert("_id".into(), json!(id));
        self
    }

    /// Set `system.<key>`.
    pub fn system(mut self, key: &str, value: Value) -> Self {
        self.system_mut().insert(key.into(), value);
        self
    }

    /// Set `system.traits.<key>`, creating the traits object.
    pub fn trait_entry(mut self, key: &str, entry: Value) -> Self {
        let traits = self
            .system_mut()
            .entry("traits")
            .or_insert_with(|| json!({}));
        traits
            .as_object_mut()
            .expect("system.traits is an object")
            .insert(key.into(), entry);
        self
    }

    pub fn item(mut self, item: ItemBuilder) -> Self {
        self.doc
            .get_mut("items")
            .and_then(Value::as_array_mut)
            .expect("items is an array")
            .push(item.build());
        self
    }

    /// Add `system.resources.<key>`.
    pub fn resource(mut self, key: &str) -> Self {
        let resources = self
            .system_mut()
            .entry("resources")
            .or_insert_with(|| json!({}));
        resources
            .as_object_mut()
            .expect("system.resources is an object")
            .insert(key.into(), json!({"value": 0, "max": 1}));
        self
    }

    /// Remove the `items` array (the document stops being an actor).
    pub fn without_items(mut self) -> Self {
        self.doc.remove("items");
        self
    }

    pub fn build(self) -> Map<String, Value> {
        self.doc
    }

    /// The document as one compact JSON line.
    pub fn line(self) -> String {
        Value::Object(self.doc).to_string()
    }

    fn system_mut(&mut self) -> &mut Map<String, Value> {
        self.doc
            .get_mut("system")
            .and_then(Value::as_object_mut)
            .expect("system is an object")
    }
}

// ---------------------------------------------------------------------------
// ItemBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for embedded items.
pub struct ItemBuilder {
    item: Map<String, Value>,
}

impl ItemBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            item: obj(json!({"_id": id, "name": name, "type": "attack", "system": {}})),
        }
    }

    /// An item with no `_id` at all.
    pub fn anonymous(name: &str) -> Self {
        Self {
            item: obj(json!({"name": name, "type": "attack", "system": {}})),
        }
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.system_mut().insert("tag".into(), json!(tag));
        self
    }

    /// Append an action; `id` of `None` leaves out its `_id`.
    pub fn action(mut self, id: Option<&str>, tag: &str) -> Self {
        let mut action = obj(json!({"name": "Attack", "tag": tag}));
        if let Some(id) = id {
            action.insert("_id".into(), json!(id));
        }
        self.system_mut()
            .entry("actions")
            .or_insert_with(|| json!([]))
            .as_array_mut()
            .expect("system.actions is an array")
            .push(Value::Object(action));
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.item)
    }

    fn system_mut(&mut self) -> &mut Map<String, Value> {
        self.item
            .get_mut("system")
            .and_then(Value::as_object_mut)
            .expect("system is an object")
    }
}
