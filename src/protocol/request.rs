//! Request definitions
//!
//! A request arrives as JSON:
//!
//! ```text
//! { "action": "internalctl",
//!   "meta":   { "var": "/tree/path", "get" | "set" | "valueReplace": <value> } }
//! ```
//!
//! It is validated once, here, into a [`VarRequest`] carrying exactly one
//! [`Operator`].

use serde_json::Value;

use crate::error::{Result, StateError};
use crate::ops::{Replacement, SetPayload};

/// The only action this engine answers
pub const ACTION_INTERNALCTL: &str = "internalctl";

/// Operator keys recognized inside `meta`
pub const OPERATOR_KEYS: [&str; 3] = ["get", "set", "valueReplace"];

/// What to do with `var`
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Read the leaf or directory at `var`
    Get,

    /// Write a scalar or merge a structure at `var`
    Set(SetPayload),

    /// Rewrite every leaf whose value equals `var`
    ValueReplace(Replacement),
}

/// A validated request
#[derive(Debug, Clone, PartialEq)]
pub struct VarRequest {
    /// Target path (for `valueReplace`, the value searched for)
    pub var: String,

    pub op: Operator,
}

impl VarRequest {
    pub fn get(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            op: Operator::Get,
        }
    }

    pub fn set(var: impl Into<String>, payload: SetPayload) -> Self {
        Self {
            var: var.into(),
            op: Operator::Set(payload),
        }
    }

    pub fn value_replace(target: impl Into<String>, replacement: Replacement) -> Self {
        Self {
            var: target.into(),
            op: Operator::ValueReplace(replacement),
        }
    }

    /// Validate a full request object (`action` + `meta`)
    pub fn from_request(request: &Value) -> Result<Self> {
        let request = request
            .as_object()
            .ok_or_else(|| malformed("request is not an object"))?;

        if let Some(action) = request.get("action") {
            if action.as_str() != Some(ACTION_INTERNALCTL) {
                return Err(malformed(format!("unsupported action {}", action)));
            }
        }

        let meta = request
            .get("meta")
            .ok_or_else(|| malformed("missing meta"))?;
        Self::from_meta(meta)
    }

    /// Validate a `meta` object
    ///
    /// Exactly one operator key must be present.
    pub fn from_meta(meta: &Value) -> Result<Self> {
        let meta = meta
            .as_object()
            .ok_or_else(|| malformed("meta is not an object"))?;

        let var = meta
            .get("var")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("meta.var must be a string"))?
            .to_string();

        let present: Vec<(&str, &Value)> = OPERATOR_KEYS
            .iter()
            .filter_map(|key| meta.get(*key).map(|value| (*key, value)))
            .collect();

        match present.as_slice() {
            [] => Err(malformed("no operator (get, set or valueReplace)")),
            [(key, value)] => Ok(Self {
                var,
                op: parse_operator(key, value)?,
            }),
            many => {
                let keys: Vec<&str> = many.iter().map(|(key, _)| *key).collect();
                Err(malformed(format!("more than one operator: {}", keys.join(", "))))
            }
        }
    }
}

fn parse_operator(key: &str, value: &Value) -> Result<Operator> {
    match key {
        "get" => Ok(Operator::Get),
        "set" => Ok(Operator::Set(SetPayload::from_wire(value))),
        _ => {
            let replacement = value
                .as_str()
                .ok_or_else(|| malformed("meta.valueReplace must be a string"))?;
            Ok(Operator::ValueReplace(Replacement::from_wire(replacement)))
        }
    }
}

fn malformed(reason: impl Into<String>) -> StateError {
    StateError::MalformedRequest(reason.into())
}
