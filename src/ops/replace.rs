//! `valueReplace` operation
//!
//! Rewrites every leaf in the tree whose value equals a search target. The
//! traversal is a fold: each visited directory threads the running
//! [`ReplaceReport`] through and hands back the updated one.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tree::{Node, Tree};

/// Wire value that asks for an environment lookup
pub const ENV_SENTINEL: &str = "ENV";

/// Replacement for matched leaves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Use this value as-is
    Literal(String),

    /// Use the environment variable named by the target, minus `%` wrapping
    Env,
}

impl Replacement {
    pub fn from_wire(value: &str) -> Self {
        if value == ENV_SENTINEL {
            Replacement::Env
        } else {
            Replacement::Literal(value.to_string())
        }
    }

    /// Resolve against the process environment
    pub fn resolve(&self, target: &str) -> String {
        self.resolve_with(target, &|name| std::env::var(name).ok())
    }

    /// Resolve with a caller-supplied variable lookup.
    ///
    /// An unset variable resolves to the literal `ENV`.
    pub fn resolve_with(&self, target: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
        match self {
            Replacement::Literal(value) => value.clone(),
            Replacement::Env => {
                let name = target.trim_matches('%');
                lookup(name).unwrap_or_else(|| {
                    tracing::debug!("environment variable {} not set, using {}", name, ENV_SENTINEL);
                    ENV_SENTINEL.to_string()
                })
            }
        }
    }
}

/// Outcome of a tree-wide replace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceReport {
    pub status: bool,

    /// Containing directory of each rewritten leaf, in traversal order.
    /// A directory appears once per leaf rewritten inside it.
    #[serde(rename = "l_fileChanged")]
    pub changed: Vec<String>,

    pub hits: usize,
}

/// Replace every leaf equal to `target`, resolving `replacement` first
pub fn value_replace(tree: &mut Tree, target: &str, replacement: &Replacement) -> Result<ReplaceReport> {
    let value = replacement.resolve(target);
    replace_all(tree, target, &value)
}

/// Depth-first rewrite of every leaf whose value is exactly `target`.
///
/// Rewrites are applied as they are found; nothing is rolled back if the
/// traversal fails part way.
pub fn replace_all(tree: &mut Tree, target: &str, value: &str) -> Result<ReplaceReport> {
    let mut report = tree.fold_dirs_mut(ReplaceReport::default(), |mut report, dir_path, dir| {
        for (name, node) in dir.children_mut() {
            if let Node::Leaf(current) = node {
                tracing::trace!("{}/{}: {}", dir_path, name, current);
                if current.as_str() == target {
                    *current = value.to_string();
                    report.hits += 1;
                    report.changed.push(dir_path.to_string());
                }
            }
        }
        Ok(report)
    })?;

    report.status = true;
    tracing::debug!("valueReplace {:?}: {} hits", target, report.hits);
    Ok(report)
}
