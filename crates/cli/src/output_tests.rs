// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn text_format_calls_the_text_branch() {
    let mut called = false;
    format_or_json(OutputFormat::Text, &json!({ "a": 1 }), || called = true).unwrap();
    assert!(called);
}

#[test]
fn json_format_does_not_call_the_text_branch() {
    let mut called = false;
    format_or_json(OutputFormat::Json, &json!({ "a": 1 }), || called = true).unwrap();
    assert!(!called);
}
