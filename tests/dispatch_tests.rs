//! Tests for Dispatcher and request validation
//!
//! These tests verify:
//! - Response envelope shapes (ok, failed, bare)
//! - Meta validation and operator parsing
//! - Rejection of requests naming several operators
//! - End-to-end get/set/valueReplace through JSON requests

use std::sync::Arc;

use serde_json::{json, Value};
use statetree::ops::{Replacement, SetPayload};
use statetree::protocol::{Operator, Response, VarRequest};
use statetree::{Config, Dispatcher, StateError, StateStore};

// =============================================================================
// Helper Functions
// =============================================================================

fn dispatcher() -> Dispatcher {
    let config = Config::builder().name("svc").verbosity(1).build();
    Dispatcher::new(Arc::new(StateStore::open(config).unwrap()))
}

fn request(meta: Value) -> Value {
    json!({ "action": "internalctl", "meta": meta })
}

fn process(dispatcher: &Dispatcher, meta: Value) -> Value {
    dispatcher.process(&request(meta)).to_json()
}

// =============================================================================
// Request Parsing Tests
// =============================================================================

#[test]
fn test_parse_each_operator() {
    let get = VarRequest::from_meta(&json!({ "var": "/a", "get": "value" })).unwrap();
    assert_eq!(get, VarRequest::get("/a"));

    let set = VarRequest::from_meta(&json!({ "var": "/a", "set": "v" })).unwrap();
    assert_eq!(set.op, Operator::Set(SetPayload::Scalar("v".into())));

    let replace = VarRequest::from_meta(&json!({ "var": "X", "valueReplace": "ENV" })).unwrap();
    assert_eq!(replace, VarRequest::value_replace("X", Replacement::Env));
}

#[test]
fn test_parse_rejects_multiple_operators() {
    let result = VarRequest::from_meta(&json!({ "var": "/a", "set": "v", "valueReplace": "w" }));
    assert!(matches!(result, Err(StateError::MalformedRequest(_))));

    let result = VarRequest::from_meta(&json!({ "var": "/a", "get": "", "set": "v" }));
    assert!(matches!(result, Err(StateError::MalformedRequest(_))));
}

#[test]
fn test_parse_rejects_bad_meta() {
    for meta in [
        json!({ "var": "/a" }),
        json!({ "get": "value" }),
        json!({ "var": 7, "get": "value" }),
        json!({ "var": "X", "valueReplace": 3 }),
        json!("not an object"),
    ] {
        let result = VarRequest::from_meta(&meta);
        assert!(
            matches!(result, Err(StateError::MalformedRequest(_))),
            "meta {} should be rejected",
            meta
        );
    }
}

#[test]
fn test_parse_request_checks_action_and_meta() {
    let wrong_action = json!({ "action": "run", "meta": { "var": "/a", "get": "" } });
    assert!(VarRequest::from_request(&wrong_action).is_err());

    let no_meta = json!({ "action": "internalctl" });
    assert!(VarRequest::from_request(&no_meta).is_err());

    let no_action = json!({ "meta": { "var": "/a", "get": "" } });
    assert_eq!(VarRequest::from_request(&no_action).unwrap(), VarRequest::get("/a"));
}

// =============================================================================
// Envelope Tests
// =============================================================================

#[test]
fn test_response_shapes() {
    assert_eq!(Response::ok(json!({ "k": "v" })).to_json(), json!({ "status": true, "d_ret": { "k": "v" } }));
    assert_eq!(Response::failed().to_json(), json!({ "status": false, "d_ret": {} }));
    assert_eq!(Response::bare().to_json(), json!({ "status": false }));
}

#[test]
fn test_response_serde_matches_to_json() {
    for response in [Response::ok(json!({ "a": "1" })), Response::failed(), Response::bare()] {
        assert_eq!(serde_json::to_value(&response).unwrap(), response.to_json());
    }
}

#[test]
fn test_empty_request_gets_bare_envelope() {
    let dispatcher = dispatcher();

    assert_eq!(dispatcher.process(&Value::Null), Response::bare());
    assert_eq!(dispatcher.process(&json!({})), Response::bare());
}

#[test]
fn test_request_without_operator_fails() {
    let dispatcher = dispatcher();

    let response = process(&dispatcher, json!({ "var": "/this/name" }));

    assert_eq!(response, json!({ "status": false, "d_ret": {} }));
}

#[test]
fn test_request_with_several_operators_fails_without_side_effects() {
    let dispatcher = dispatcher();

    let response = process(&dispatcher, json!({ "var": "/this/name", "set": "new", "valueReplace": "svc" }));

    assert_eq!(response["status"], json!(false));
    assert_eq!(
        process(&dispatcher, json!({ "var": "/this/name", "get": "" })),
        json!({ "status": true, "d_ret": { "/this/name": "svc" } })
    );
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[test]
fn test_get_leaf_and_directory() {
    let dispatcher = dispatcher();

    assert_eq!(
        process(&dispatcher, json!({ "var": "/this/verbosity", "get": "value" })),
        json!({ "status": true, "d_ret": { "/this/verbosity": "1" } })
    );

    let response = process(&dispatcher, json!({ "var": "/this", "get": "value" }));
    assert_eq!(response["d_ret"]["name"], json!("svc"));
    assert!(response["d_ret"]["args"].is_object());
}

#[test]
fn test_get_missing_path_fails() {
    let dispatcher = dispatcher();

    let response = process(&dispatcher, json!({ "var": "/nowhere", "get": "value" }));

    assert_eq!(response, json!({ "status": false, "d_ret": {} }));
}

#[test]
fn test_set_scalar_then_get() {
    let dispatcher = dispatcher();

    let set = process(&dispatcher, json!({ "var": "/job/state", "set": "42" }));
    assert_eq!(set, json!({ "status": true, "d_ret": { "/job/state": "42" } }));

    let get = process(&dispatcher, json!({ "var": "/job/state", "get": "" }));
    assert_eq!(get["d_ret"]["/job/state"], json!("42"));
}

#[test]
fn test_set_structured_from_object_and_string() {
    let dispatcher = dispatcher();

    let from_object = process(&dispatcher, json!({ "var": "/cfg", "set": { "a": { "b": "1" } } }));
    assert_eq!(from_object, json!({ "status": true, "d_ret": { "a": { "b": "1" } } }));

    let from_string = process(&dispatcher, json!({ "var": "/cfg", "set": "{\"c\": \"2\"}" }));
    assert_eq!(from_string["status"], json!(true));

    let get = process(&dispatcher, json!({ "var": "/cfg", "get": "" }));
    assert_eq!(get["d_ret"], json!({ "a": { "b": "1" }, "c": "2" }));
}

#[test]
fn test_set_kind_conflict_fails() {
    let dispatcher = dispatcher();

    let response = process(&dispatcher, json!({ "var": "/this/name", "set": { "k": "v" } }));

    assert_eq!(response, json!({ "status": false, "d_ret": {} }));
}

#[test]
fn test_value_replace_literal() {
    let dispatcher = dispatcher();
    process(&dispatcher, json!({ "var": "/", "set": { "a": "X", "b": { "c": "X", "d": "Y" } } }));

    let response = process(&dispatcher, json!({ "var": "X", "valueReplace": "Z" }));

    assert_eq!(
        response,
        json!({
            "status": true,
            "d_ret": { "status": true, "l_fileChanged": ["/", "/b"], "hits": 2 }
        })
    );
    assert_eq!(
        process(&dispatcher, json!({ "var": "/b/d", "get": "" }))["d_ret"]["/b/d"],
        json!("Y")
    );
}

#[test]
fn test_value_replace_env() {
    std::env::set_var("STATETREE_DISPATCH_TEST_FOO", "bar");
    std::env::remove_var("STATETREE_DISPATCH_TEST_UNSET");
    let dispatcher = dispatcher();
    process(
        &dispatcher,
        json!({ "var": "/env", "set": {
            "set": "%STATETREE_DISPATCH_TEST_FOO%",
            "unset": "%STATETREE_DISPATCH_TEST_UNSET%"
        } }),
    );

    process(&dispatcher, json!({ "var": "%STATETREE_DISPATCH_TEST_FOO%", "valueReplace": "ENV" }));
    process(&dispatcher, json!({ "var": "%STATETREE_DISPATCH_TEST_UNSET%", "valueReplace": "ENV" }));

    let get = process(&dispatcher, json!({ "var": "/env", "get": "" }));
    assert_eq!(get["d_ret"], json!({ "set": "bar", "unset": "ENV" }));
}
