//! Core types shared by the repair components and the pipeline.
//!
//! Documents themselves are plain `serde_json::Map<String, Value>`; the
//! JSON value enum is the tagged-variant model every rule matches on. This
//! module adds the small typed views the rules need on top of it: the
//! [`ActorKind`] classification and the [`ReportEntry`] emitted for each
//! patched document.

use serde_json::{Map, Value};

/// Document `type` of a playable character.
pub const CHARACTER: &str = "character";
/// Document `type` of a non-player character.
pub const NPC: &str = "npc";

/// Which kind of actor a document is, judged by its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Character,
    Npc,
}

impl ActorKind {
    /// Classify a document. Anything that is not a character or NPC is `None`.
    pub fn of(doc: &Map<String, Value>) -> Option<Self> {
        match doc_type(doc)? {
            CHARACTER => Some(ActorKind::Character),
            NPC => Some(ActorKind::Npc),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorKind::Character => write!(f, "{CHARACTER}"),
            ActorKind::Npc => write!(f, "{NPC}"),
        }
    }
}

/// The document's `type` field, if it is a string.
pub fn doc_type(doc: &Map<String, Value>) -> Option<&str> {
    doc.get("type").and_then(Value::as_str)
}

/// True for character/NPC documents that carry an `items` array.
pub fn is_actor(doc: &Map<String, Value>) -> bool {
    ActorKind::of(doc).is_some() && matches!(doc.get("items"), Some(Value::Array(_)))
}

/// Render an optional JSON value the way reports print it: JSON text,
/// `null` when absent.
pub fn display_value(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), Value::to_string)
}

// ---------------------------------------------------------------------------
// Report entries
// ---------------------------------------------------------------------------

/// One line of the audit report: which document was patched and how.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// 1-based line number in the source file.
    pub line_no: u64,
    pub doc_type: Option<Value>,
    pub name: Option<Value>,
    pub id: Option<Value>,
    /// Human-readable change descriptions, in the order they were applied.
    pub changes: Vec<String>,
}

impl ReportEntry {
    /// Capture the identifying fields of `doc` together with its changes.
    pub fn new(line_no: u64, doc: &Map<String, Value>, changes: Vec<String>) -> Self {
        Self {
            line_no,
            doc_type: doc.get("type").cloned(),
            name: doc.get("name").cloned(),
            id: doc.get("_id").cloned(),
            changes,
        }
    }
}

impl std::fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}: type={}, name={}, _id={} -> {}",
            self.line_no,
            display_value(self.doc_type.as_ref()),
            display_value(self.name.as_ref()),
            display_value(self.id.as_ref()),
            self.changes.join("; ")
        )
    }
}
