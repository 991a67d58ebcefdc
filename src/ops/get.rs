//! `get` operation

use serde_json::{Map, Value};

use crate::error::Result;
use crate::tree::Tree;

/// Read `var` from the tree.
///
/// A directory comes back as a nested mapping of its contents (re-rooted at
/// `/`); a leaf comes back as `{var: value}`. Missing paths are
/// `PathNotFound`.
pub fn get(tree: &Tree, var: &str) -> Result<Map<String, Value>> {
    if tree.is_dir(var) {
        let copy = tree.subtree(var)?;
        tracing::debug!("get {}: directory with {} entries", var, copy.root().len());
        return Ok(copy.root().to_map());
    }

    let value = tree.cat(var)?;
    tracing::debug!("get {}: leaf", var);

    let mut ret = Map::new();
    ret.insert(var.to_string(), Value::String(value));
    Ok(ret)
}
