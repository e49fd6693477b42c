//! JSON request handling end to end

use crate::*;
use std::sync::Arc;
use stockguard_executor::{handle_json, Executor};

fn executor() -> Executor {
    Executor::new(Arc::clone(create_db().ledger()))
}

#[test]
fn test_session_over_json_lines() {
    let exec = executor();
    let lines = [
        (r#"{"op":"checkin","barcode":"890123"}"#, 200),
        (r#"{"op":"checkin","itemKey":"890123","isBroken":true}"#, 200),
        (r#"{"op":"sale","itemKey":"890123"}"#, 200),
        (r#"{"op":"sale","itemKey":"890123"}"#, 400),
        (r#"{"op":"return","returnId":"890123","destination":"shelf"}"#, 200),
        (r#"{"op":"return","returnId":"890123","destination":"trash"}"#, 200),
        (r#"{"op":"return","returnId":"nope","destination":"shelf"}"#, 404),
        (r#"{"op":"return","returnId":"890123","destination":"attic"}"#, 400),
        (r#"{"op":"inventory"}"#, 200),
    ];

    for (line, status) in lines {
        let resp = handle_json(&exec, line);
        assert_eq!(resp.status, status, "{} -> {}", line, resp.body);
    }

    let resp = handle_json(&exec, r#"{"op":"item","itemKey":"890123"}"#);
    assert_eq!(resp.body["count"], 1);
    assert_eq!(resp.body["reserved"], 1);
    assert_eq!(resp.body["status"], "Low");

    let resp = handle_json(&exec, r#"{"op":"bin","bin":"trash"}"#);
    assert_eq!(resp.body[0]["count"], 1);
}

#[test]
fn test_trial_report_shape() {
    let exec = executor();
    handle_json(&exec, r#"{"op":"seed","itemKey":"A","count":3}"#);
    let resp = handle_json(&exec, r#"{"op":"trial","itemKey":"A","numRequests":5}"#);
    assert_eq!(resp.status, 200);

    let body = &resp.body;
    assert_eq!(body["totalRequests"], 5);
    assert_eq!(body["successful"], 3);
    assert_eq!(body["prevented"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 5);
    assert!(body["results"][0]["waitTime"].is_number());
    assert!(body["trialId"].is_string());
}

#[test]
fn test_trial_on_missing_item_is_404() {
    let exec = executor();
    let resp = handle_json(&exec, r#"{"op":"trial","itemKey":"ghost"}"#);
    assert_eq!(resp.status, 404);
}
