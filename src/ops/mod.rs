//! Variable Operations
//!
//! The request semantics applied to a [`Tree`](crate::tree::Tree).
//!
//! ## Operations
//! - `get`: leaf value, or a standalone copy of a directory
//! - `set`: scalar leaf write, or a deep merge of a JSON object
//! - `value_replace`: tree-wide exact-match rewrite of leaf values
//! - `substitute`: substring replacement inside one leaf
//!
//! Every operation is a plain function over the tree. Locking and mirror
//! upkeep belong to [`StateStore`](crate::state::StateStore).

mod get;
mod set;
mod replace;
mod substitute;

pub use get::get;
pub use set::{set, SetPayload};
pub use replace::{replace_all, value_replace, ReplaceReport, Replacement, ENV_SENTINEL};
pub use substitute::substitute;
