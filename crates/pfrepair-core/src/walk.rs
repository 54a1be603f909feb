//! Generic traversal over the JSON document tree.
//!
//! [`rewrite_scalars`] visits every scalar (string, number, bool, null) in
//! a value, depth-first in document order, and lets a per-scalar transform
//! replace it. The transform sees the [`JsonPath`] of the scalar so rules can
//! both describe what they changed and skip subtrees they must not touch.

use serde_json::Value;
use std::fmt;

/// One step from a container into a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a node inside a document, e.g. `items[2].system.tag`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath(Vec<Segment>);

impl JsonPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// True when the leading segments are exactly the object keys in `keys`.
    pub fn starts_with_keys(&self, keys: &[&str]) -> bool {
        self.0.len() >= keys.len()
            && self
                .0
                .iter()
                .zip(keys)
                .all(|(seg, key)| matches!(seg, Segment::Key(k) if k == key))
    }

    /// The object key at position `idx`, if that segment is a key.
    pub fn key_at(&self, idx: usize) -> Option<&str> {
        match self.0.get(idx)? {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    fn push(&mut self, seg: Segment) {
        self.0.push(seg);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "$");
        }
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Visit every scalar under `value`; wherever `transform` returns
/// `Some(new)`, the scalar is replaced. Returns the number of replacements.
pub fn rewrite_scalars<F>(value: &mut Value, transform: &mut F) -> usize
where
    F: FnMut(&JsonPath, &Value) -> Option<Value>,
{
    let mut path = JsonPath::new();
    rewrite_at(value, &mut path, transform)
}

fn rewrite_at<F>(value: &mut Value, path: &mut JsonPath, transform: &mut F) -> usize
where
    F: FnMut(&JsonPath, &Value) -> Option<Value>,
{
    match value {
        Value::Object(map) => {
            let mut n = 0;
            for (key, child) in map.iter_mut() {
                path.push(Segment::Key(key.clone()));
                n += rewrite_at(child, path, transform);
                path.pop();
            }
            n
        }
        Value::Array(items) => {
            let mut n = 0;
            for (idx, child) in items.iter_mut().enumerate() {
                path.push(Segment::Index(idx));
                n += rewrite_at(child, path, transform);
                path.pop();
            }
            n
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {
            match transform(path, value) {
                Some(new) => {
                    *value = new;
                    1
                }
                None => 0,
            }
        }
    }
}
