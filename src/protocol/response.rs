//! Response definitions
//!
//! Every reply is `{status, d_ret}`. The only shape without `d_ret` is the
//! answer to an empty request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the request was valid and the operation succeeded
    pub status: bool,

    /// Operation result mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_ret: Option<Value>,
}

impl Response {
    /// Create a successful response
    pub fn ok(d_ret: Value) -> Self {
        Self {
            status: true,
            d_ret: Some(d_ret),
        }
    }

    /// Create a failed response with an empty result mapping
    pub fn failed() -> Self {
        Self {
            status: false,
            d_ret: Some(Value::Object(Map::new())),
        }
    }

    /// Create the bare `{status: false}` reply to an empty request
    pub fn bare() -> Self {
        Self {
            status: false,
            d_ret: None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("status".to_string(), Value::Bool(self.status));
        if let Some(d_ret) = &self.d_ret {
            out.insert("d_ret".to_string(), d_ret.clone());
        }
        Value::Object(out)
    }
}
