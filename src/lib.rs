//! # statetree
//!
//! A process-wide hierarchical state tree with:
//! - Filesystem-like paths (`/this/verbosity`)
//! - JSON snapshot load/save
//! - `get` / `set` / `valueReplace` requests answered as `{status, d_ret}`
//! - Single-writer/multi-reader concurrency model
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Transport (caller-owned)                    │
//! │              decodes {"action", "meta"} JSON                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Dispatcher                              │
//! │        (validate meta → one operator → envelope)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      StateStore                              │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  ops (get,  │─────────▶│    Tree     │
//!   │ set, replace)│         │  (RwLock)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Mirror    │
//!                           │   (JSON)    │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod tree;
pub mod ops;
pub mod protocol;
pub mod state;
pub mod dispatch;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StateError, Result};
pub use config::Config;
pub use dispatch::Dispatcher;
pub use state::StateStore;
pub use tree::Tree;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of statetree
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
