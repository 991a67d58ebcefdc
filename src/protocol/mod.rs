//! Protocol Module
//!
//! Request and response shapes exchanged with the transport layer.
//!
//! ## Request Format
//! ```text
//! { "action": "internalctl",
//!   "meta": { "var": <path>, "get" | "set" | "valueReplace": <value> } }
//! ```
//!
//! ## Response Format
//! ```text
//! { "status": <bool>, "d_ret": <result mapping> }
//! ```
//!
//! ### Result Mappings
//! - get:          `{var: value}` or the nested directory contents
//! - set:          `{var: value}` or the merged object
//! - valueReplace: `{status, l_fileChanged, hits}`

mod request;
mod response;

pub use request::{Operator, VarRequest, ACTION_INTERNALCTL, OPERATOR_KEYS};
pub use response::Response;
