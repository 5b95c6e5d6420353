// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brr dispatch` — loads a manifest-only fake bundle, then runs one
//! message through the real dispatcher and prints the reply.
//!
//! The bundle's VFS is the in-memory fake with no files preloaded, so
//! file operations will mostly report "not found" — this exercises
//! routing, the precondition gate, and the loader pipeline, not file
//! content (that's the concern of whatever real `VfsCore` is wired up in
//! production).

use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};
use crate::session;
use brr_core::ClientId;
use brr_wire::Request;
use serde_json::Value;
use std::path::Path;

pub async fn handle(
    manifest_path: &Path,
    launcher_bundle_id: &str,
    ws_url: Option<&str>,
    op: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let bundle_bytes = std::fs::read(manifest_path)
        .map_err(|e| ExitError::new(1, format!("failed to read {}: {e}", manifest_path.display())))?;

    let ctx = session::build_ctx();
    let id = launcher_bundle_id.into();

    let load = brr_runtime::load_bundle(&ctx, id, Some(bundle_bytes), ws_url.map(str::to_string), None).await;
    if !load.success {
        return Err(ExitError::new(
            1,
            format!("load failed: {}", load.error.unwrap_or_else(|| "unknown error".to_string())),
        )
        .into());
    }

    let mut op_value: Value = serde_json::from_str(op)
        .map_err(|e| ExitError::new(1, format!("invalid operation JSON: {e}")))?;
    if let Value::Object(map) = &mut op_value {
        map.entry("launcherBundleId").or_insert_with(|| Value::String(launcher_bundle_id.to_string()));
    }
    let request: Request = serde_json::from_value(op_value)
        .map_err(|e| ExitError::new(1, format!("invalid operation: {e}")))?;

    let reply = brr_runtime::dispatch(&ctx, &ClientId::from("cli"), request).await;

    format_or_json(format, &reply, || {
        println!("{}: success={}", reply.kind, reply.success);
        if let Some(data) = &reply.data {
            println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
        }
        if let Some(error) = &reply.error {
            println!("error: {error}");
        }
    })
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
