//! Tree nodes
//!
//! A node is either a leaf holding one string or a directory of named
//! children. Children are kept in a BTreeMap so listings and traversals
//! come out in name order.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{Result, StateError};

use super::path::is_segment;

/// A single node in the state tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A string value, no children
    Leaf(String),

    /// Named children, no value
    Dir(Dir),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }

    /// Build a node from JSON.
    ///
    /// Objects become directories and strings become leaves. Every other
    /// value is stored as its JSON text, except `null` which becomes "".
    /// Fails on any key, at any depth, that is not a single path segment.
    pub fn from_json(value: &Value) -> Result<Node> {
        Ok(match value {
            Value::Object(map) => Node::Dir(Dir::from_map(map)?),
            Value::String(s) => Node::Leaf(s.clone()),
            Value::Null => Node::Leaf(String::new()),
            other => Node::Leaf(other.to_string()),
        })
    }

    pub fn to_json(&self) -> Value {
        match self {
            Node::Leaf(value) => Value::String(value.clone()),
            Node::Dir(dir) => dir.to_json(),
        }
    }
}

/// A directory node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dir {
    children: BTreeMap<String, Node>,
}

impl Dir {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let children = map
            .iter()
            .map(|(name, value)| {
                if !is_segment(name) {
                    return Err(StateError::InvalidSetPayload(format!(
                        "key {:?} is not a single path segment",
                        name
                    )));
                }
                Ok((name.clone(), Node::from_json(value)?))
            })
            .collect::<Result<_>>()?;
        Ok(Self { children })
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.to_map())
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.children
            .iter()
            .map(|(name, node)| (name.clone(), node.to_json()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        self.children.insert(name.into(), node)
    }

    pub fn children(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.children.iter()
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.children.iter_mut()
    }

    /// Names of the leaves directly inside this directory
    pub fn leaf_names(&self) -> Vec<String> {
        self.children
            .iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names of the directories directly inside this directory
    pub fn dir_names(&self) -> Vec<String> {
        self.children
            .iter()
            .filter(|(_, node)| node.is_dir())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn entry_or_dir(&mut self, name: &str) -> &mut Node {
        self.children
            .entry(name.to_string())
            .or_insert_with(|| Node::Dir(Dir::new()))
    }
}
