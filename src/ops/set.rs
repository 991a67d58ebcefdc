//! `set` operation

use serde_json::{Map, Value};

use crate::error::Result;
use crate::tree::{path, Tree};

/// What a `set` writes
#[derive(Debug, Clone, PartialEq)]
pub enum SetPayload {
    /// A single leaf value
    Scalar(String),

    /// A JSON object merged in as a subtree
    Structured(Map<String, Value>),
}

impl SetPayload {
    /// Classify a payload as it arrives on the wire.
    ///
    /// Objects, and strings holding a JSON object, are structured. Anything
    /// else is a scalar carrying the original text: a string stays verbatim
    /// (so `"42"` is the leaf `42`), other JSON values keep their JSON text.
    pub fn from_wire(value: &Value) -> Self {
        match value {
            Value::Object(map) => SetPayload::Structured(map.clone()),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => SetPayload::Structured(map),
                _ => SetPayload::Scalar(text.clone()),
            },
            other => SetPayload::Scalar(other.to_string()),
        }
    }
}

/// Write `payload` at `var`.
///
/// Scalars create or overwrite the leaf (and any missing parents) and return
/// `{var: value}`. Structured payloads create `var` as a directory when it is
/// absent and merge each top-level key under it: same-named leaves are
/// overwritten, same-named directories merged, everything else left alone.
/// The payload object itself is returned.
///
/// A node-kind clash is `InvalidSetPayload`; keys merged before the clash
/// stay written.
pub fn set(tree: &mut Tree, var: &str, payload: &SetPayload) -> Result<Map<String, Value>> {
    match payload {
        SetPayload::Scalar(value) => {
            tree.touch(var, value.as_str())?;
            let written = tree.cat(var)?;
            tracing::debug!("set {}: leaf", var);

            let mut ret = Map::new();
            ret.insert(var.to_string(), Value::String(written));
            Ok(ret)
        }
        SetPayload::Structured(map) => {
            // Validates every key at every depth before anything is written
            let source = Tree::from_map(map)?;
            if !tree.is_dir(var) {
                tree.mkdir(var)?;
            }
            for name in map.keys() {
                source.copy_subtree(&path::join("/", name), tree, var)?;
            }
            tracing::debug!("set {}: merged {} top-level keys", var, map.len());

            Ok(map.clone())
        }
    }
}
