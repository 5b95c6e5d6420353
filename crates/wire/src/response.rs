// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reply shape returned to the originating client.

use serde::Serialize;
use serde_json::Value;

/// `{ type, id, success, data?, error? }`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Reply {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn ok(kind: impl Into<String>, id: Option<String>, data: Option<Value>) -> Self {
        Self { kind: kind.into(), id, success: true, data, error: None }
    }

    pub fn err(kind: impl Into<String>, id: Option<String>, error: impl std::fmt::Display) -> Self {
        Self { kind: kind.into(), id, success: false, data: None, error: Some(error.to_string()) }
    }
}
