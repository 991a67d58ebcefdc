//! Error types for statetree
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StateError
pub type Result<T> = std::result::Result<T, StateError>;

/// Unified error type for statetree operations
#[derive(Debug, Error)]
pub enum StateError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Startup Errors
    // -------------------------------------------------------------------------
    /// Snapshot file exists but could not be turned into a state tree
    #[error("Config load error: {0}")]
    ConfigLoad(String),

    // -------------------------------------------------------------------------
    // Tree Errors
    // -------------------------------------------------------------------------
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a leaf: {0}")]
    NotALeaf(String),

    /// Destination conflicts with the kind of an existing node
    #[error("Invalid set payload: {0}")]
    InvalidSetPayload(String),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
