//! Request Dispatcher
//!
//! Turns a raw request object into a response envelope. Nothing fails past
//! this point: every error becomes `status: false`, with the reason logged.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::StateError;
use crate::protocol::{Operator, Response, VarRequest, ACTION_INTERNALCTL};
use crate::state::StateStore;

/// Routes `internalctl` requests to a shared [`StateStore`]
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<StateStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    /// Process one request
    ///
    /// - empty or absent request → `{status: false}` (no `d_ret`)
    /// - invalid request or failed operation → `{status: false, d_ret: {}}`
    /// - otherwise → `{status: true, d_ret: <result>}`
    pub fn process(&self, request: &Value) -> Response {
        if is_empty(request) {
            tracing::debug!("Empty request");
            return Response::bare();
        }

        let request = match VarRequest::from_request(request) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Rejected request: {}", e);
                return Response::failed();
            }
        };

        tracing::trace!("Dispatching {:?}", request);

        match self.store.execute(&request) {
            Ok(d_ret) => Response::ok(d_ret),
            Err(e @ (StateError::PathNotFound(_) | StateError::NotALeaf(_))) => {
                tracing::debug!("{} on {}: {}", operator_name(&request), request.var, e);
                Response::failed()
            }
            Err(e) => {
                tracing::warn!("{} on {} failed: {}", operator_name(&request), request.var, e);
                Response::failed()
            }
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}

fn is_empty(request: &Value) -> bool {
    match request {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn operator_name(request: &VarRequest) -> &'static str {
    match request.op {
        Operator::Get => "get",
        Operator::Set(_) => "set",
        Operator::ValueReplace(_) => "valueReplace",
    }
}

/// Build an `internalctl` request object around a `meta` mapping
pub fn internalctl(meta: Map<String, Value>) -> Value {
    let mut request = Map::new();
    request.insert(
        "action".to_string(),
        Value::String(ACTION_INTERNALCTL.to_string()),
    );
    request.insert("meta".to_string(), Value::Object(meta));
    Value::Object(request)
}
