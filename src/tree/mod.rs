//! Tree Module
//!
//! The hierarchical store behind the state engine.
//!
//! ## Responsibilities
//! - Resolve absolute and relative `/`-separated paths
//! - Read, write and create leaves and directories
//! - Copy subtrees into other trees (merge) or onto disk
//! - Depth-first folds over every directory
//!
//! ## Data Structure Choice
//! Nested BTreeMaps of [`Node`]s:
//! - A node is a leaf (one string) or a directory (children), never both
//! - Node kind is fixed once created; writes that would flip it fail
//! - Name-ordered children give deterministic listings and traversals

pub mod path;
mod node;
mod store;

pub use node::{Dir, Node};
pub use store::Tree;
