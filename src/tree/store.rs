//! Tree implementation
//!
//! Path navigation, leaf reads/writes, subtree copies and depth-first
//! traversal over a single rooted tree of [`Node`]s.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, StateError};

use super::node::{Dir, Node};
use super::path::{is_segment, join, render, resolve};

/// A rooted tree of named nodes with a current directory
///
/// Relative paths passed to any method are resolved against the current
/// directory set with [`Tree::cd`]. The root is always a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    /// Root directory
    root: Dir,

    /// Current directory, as segments from the root
    cwd: Vec<String>,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a JSON mapping (objects become directories)
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            root: Dir::from_map(map)?,
            cwd: Vec::new(),
        })
    }

    /// Build a tree from a JSON value, which must be an object
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(StateError::InvalidSetPayload(format!(
                "tree root must be a JSON object, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Export the whole tree as nested JSON objects
    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }

    /// Root directory
    pub fn root(&self) -> &Dir {
        &self.root
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Current directory as an absolute path
    pub fn pwd(&self) -> String {
        render(&self.cwd)
    }

    /// Change the current directory
    pub fn cd(&mut self, path: &str) -> Result<()> {
        let segs = resolve(&self.cwd, path);
        if self.find_dir(&segs).is_none() {
            return Err(StateError::PathNotFound(render(&segs)));
        }
        self.cwd = segs;
        Ok(())
    }

    /// Resolve a path to its absolute form
    pub fn absolute(&self, path: &str) -> String {
        render(&resolve(&self.cwd, path))
    }

    pub fn exists(&self, path: &str) -> bool {
        let segs = resolve(&self.cwd, path);
        segs.is_empty() || self.find(&segs).is_some()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.find_dir(&resolve(&self.cwd, path)).is_some()
    }

    // =========================================================================
    // Leaves and Directories
    // =========================================================================

    /// Read a leaf value
    pub fn cat(&self, path: &str) -> Result<String> {
        let segs = resolve(&self.cwd, path);
        if segs.is_empty() {
            return Err(StateError::NotALeaf("/".to_string()));
        }
        match self.find(&segs) {
            Some(Node::Leaf(value)) => Ok(value.clone()),
            Some(Node::Dir(_)) => Err(StateError::NotALeaf(render(&segs))),
            None => Err(StateError::PathNotFound(render(&segs))),
        }
    }

    /// Write a leaf value, creating the leaf and any missing parents
    pub fn touch(&mut self, path: &str, value: impl Into<String>) -> Result<()> {
        let segs = resolve(&self.cwd, path);
        let (name, parents) = segs.split_last().ok_or_else(|| {
            StateError::InvalidSetPayload("cannot store a value at /".to_string())
        })?;

        let parent = ensure_dir(&mut self.root, parents)?;
        match parent.get_mut(name) {
            Some(Node::Leaf(current)) => *current = value.into(),
            Some(Node::Dir(_)) => {
                return Err(StateError::InvalidSetPayload(format!(
                    "{} is a directory",
                    render(&segs)
                )))
            }
            None => {
                parent.insert(name.clone(), Node::Leaf(value.into()));
            }
        }
        Ok(())
    }

    /// Create a directory and any missing parents
    pub fn mkdir(&mut self, path: &str) -> Result<()> {
        let segs = resolve(&self.cwd, path);
        ensure_dir(&mut self.root, &segs)?;
        Ok(())
    }

    /// Names of the leaves directly inside a directory
    pub fn lsf(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.dir_at(path)?.leaf_names())
    }

    /// Names of the directories directly inside a directory
    pub fn lsd(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.dir_at(path)?.dir_names())
    }

    /// Number of leaves in the whole tree
    pub fn leaf_count(&self) -> usize {
        self.fold_dirs(0usize, |count, _, dir| Ok(count + dir.leaf_names().len()))
            .unwrap_or(0)
    }

    // =========================================================================
    // Copies
    // =========================================================================

    /// Standalone copy of a directory, re-rooted at `/`
    pub fn subtree(&self, path: &str) -> Result<Tree> {
        Ok(Tree {
            root: self.dir_at(path)?.clone(),
            cwd: Vec::new(),
        })
    }

    /// Copy the node at `src` into `dest` under `dest_root`.
    ///
    /// The copied node keeps its name: copying `/a/b` to `/x` lands at
    /// `/x/b`. Copying `/` merges every top-level child into `dest_root`.
    /// Same-named leaves are overwritten, same-named directories are merged,
    /// and a leaf/directory clash is an `InvalidSetPayload`.
    pub fn copy_subtree(&self, src: &str, dest: &mut Tree, dest_root: &str) -> Result<()> {
        let src_segs = resolve(&self.cwd, src);
        let dest_segs = resolve(&dest.cwd, dest_root);
        let dest_path = render(&dest_segs);

        if src_segs.is_empty() {
            let target = ensure_dir(&mut dest.root, &dest_segs)?;
            return merge_children(target, &self.root, &dest_path);
        }

        let node = self
            .find(&src_segs)
            .ok_or_else(|| StateError::PathNotFound(render(&src_segs)))?;
        let name = &src_segs[src_segs.len() - 1];
        let target = ensure_dir(&mut dest.root, &dest_segs)?;
        merge_node(target, name, node, &dest_path)
    }

    /// Copy the node at `src` onto disk under `dir`.
    ///
    /// Directories become directories and leaves become files holding their
    /// value. Returns the number of files written.
    pub fn write_to_disk(&self, src: &str, dir: &Path) -> Result<usize> {
        let segs = resolve(&self.cwd, src);
        fs::create_dir_all(dir)?;

        if segs.is_empty() {
            return write_dir(&self.root, dir);
        }
        match self.find(&segs) {
            Some(Node::Leaf(value)) => {
                fs::write(dir.join(&segs[segs.len() - 1]), value)?;
                Ok(1)
            }
            Some(Node::Dir(sub)) => write_dir(sub, &dir.join(&segs[segs.len() - 1])),
            None => Err(StateError::PathNotFound(render(&segs))),
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Depth-first fold over every directory, root first.
    ///
    /// The visitor receives the accumulator, the directory's absolute path
    /// and the directory itself, and returns the next accumulator.
    pub fn fold_dirs<A, F>(&self, init: A, mut visit: F) -> Result<A>
    where
        F: FnMut(A, &str, &Dir) -> Result<A>,
    {
        let mut path = Vec::new();
        fold_dir(&self.root, &mut path, init, &mut visit)
    }

    /// Depth-first fold that may rewrite each directory's leaves in place
    pub fn fold_dirs_mut<A, F>(&mut self, init: A, mut visit: F) -> Result<A>
    where
        F: FnMut(A, &str, &mut Dir) -> Result<A>,
    {
        let mut path = Vec::new();
        fold_dir_mut(&mut self.root, &mut path, init, &mut visit)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn find(&self, segs: &[String]) -> Option<&Node> {
        let (name, parents) = segs.split_last()?;
        let mut dir = &self.root;
        for seg in parents {
            match dir.get(seg)? {
                Node::Dir(sub) => dir = sub,
                Node::Leaf(_) => return None,
            }
        }
        dir.get(name)
    }

    fn find_dir(&self, segs: &[String]) -> Option<&Dir> {
        if segs.is_empty() {
            return Some(&self.root);
        }
        match self.find(segs)? {
            Node::Dir(dir) => Some(dir),
            Node::Leaf(_) => None,
        }
    }

    fn dir_at(&self, path: &str) -> Result<&Dir> {
        let segs = resolve(&self.cwd, path);
        self.find_dir(&segs)
            .ok_or_else(|| StateError::PathNotFound(format!("{} is not a directory", render(&segs))))
    }
}

/// Walk (creating as needed) down to a directory
fn ensure_dir<'a>(root: &'a mut Dir, segs: &[String]) -> Result<&'a mut Dir> {
    let mut dir = root;
    for (depth, seg) in segs.iter().enumerate() {
        dir = match dir.entry_or_dir(seg) {
            Node::Dir(sub) => sub,
            Node::Leaf(_) => {
                return Err(StateError::InvalidSetPayload(format!(
                    "{} is a leaf, expected a directory",
                    render(&segs[..=depth])
                )))
            }
        };
    }
    Ok(dir)
}

fn merge_children(target: &mut Dir, src: &Dir, at: &str) -> Result<()> {
    for (name, child) in src.children() {
        merge_node(target, name, child, at)?;
    }
    Ok(())
}

fn merge_node(target: &mut Dir, name: &str, src: &Node, at: &str) -> Result<()> {
    let path = join(at, name);
    let existing = match target.get_mut(name) {
        Some(existing) => existing,
        None => {
            target.insert(name, src.clone());
            return Ok(());
        }
    };

    match (existing, src) {
        (Node::Leaf(current), Node::Leaf(value)) => *current = value.clone(),
        (Node::Dir(current), Node::Dir(incoming)) => merge_children(current, incoming, &path)?,
        (Node::Leaf(_), Node::Dir(_)) => {
            return Err(StateError::InvalidSetPayload(format!(
                "{} is a leaf, cannot merge a directory into it",
                path
            )))
        }
        (Node::Dir(_), Node::Leaf(_)) => {
            return Err(StateError::InvalidSetPayload(format!(
                "{} is a directory, cannot overwrite it with a value",
                path
            )))
        }
    }
    Ok(())
}

fn write_dir(dir: &Dir, to: &Path) -> Result<usize> {
    fs::create_dir_all(to)?;
    let mut written = 0;
    for (name, node) in dir.children() {
        if !is_segment(name) {
            return Err(StateError::InvalidSetPayload(format!(
                "refusing to write {:?} under {}",
                name,
                to.display()
            )));
        }
        match node {
            Node::Leaf(value) => {
                fs::write(to.join(name), value)?;
                written += 1;
            }
            Node::Dir(sub) => written += write_dir(sub, &to.join(name))?,
        }
    }
    Ok(written)
}

fn fold_dir<A, F>(dir: &Dir, path: &mut Vec<String>, acc: A, visit: &mut F) -> Result<A>
where
    F: FnMut(A, &str, &Dir) -> Result<A>,
{
    let mut acc = visit(acc, &render(path), dir)?;
    for (name, child) in dir.children() {
        if let Node::Dir(sub) = child {
            path.push(name.clone());
            acc = fold_dir(sub, path, acc, visit)?;
            path.pop();
        }
    }
    Ok(acc)
}

fn fold_dir_mut<A, F>(dir: &mut Dir, path: &mut Vec<String>, acc: A, visit: &mut F) -> Result<A>
where
    F: FnMut(A, &str, &mut Dir) -> Result<A>,
{
    let mut acc = visit(acc, &render(path), &mut *dir)?;
    for (name, child) in dir.children_mut() {
        if let Node::Dir(sub) = child {
            path.push(name.clone());
            acc = fold_dir_mut(sub, path, acc, visit)?;
            path.pop();
        }
    }
    Ok(acc)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
