//! Substring substitution inside a single leaf

use crate::error::Result;
use crate::tree::Tree;

/// Replace every occurrence of `target` in the leaf at `path` with
/// `new_value` and return the rewritten value
pub fn substitute(tree: &mut Tree, path: &str, target: &str, new_value: &str) -> Result<String> {
    let original = tree.cat(path)?;
    let replaced = original.replace(target, new_value);
    tree.touch(path, replaced.as_str())?;
    tracing::debug!("substitute {}: {:?} -> {:?}", path, target, new_value);
    Ok(replaced)
}
