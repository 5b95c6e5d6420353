// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brr manifest` — parses a bundle manifest file and prints the defaults
//! the loader would derive from it.

use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};
use brr_core::Manifest;
use serde_json::json;
use std::path::Path;

pub fn handle(path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)
        .map_err(|e| ExitError::new(1, format!("failed to read {}: {e}", path.display())))?;
    let manifest: Manifest = serde_json::from_slice(&bytes)
        .map_err(|e| ExitError::new(1, format!("invalid manifest: {e}")))?;

    let data = json!({
        "manifest": manifest,
        "defaultAppSlug": manifest.default_app_slug(),
        "defaultWsUrl": manifest.default_ws_url(),
    });

    format_or_json(format, &data, || {
        println!("root id:        {}", manifest.root_id);
        println!("entrypoints:    {}", manifest.entrypoints.join(", "));
        println!("network uris:   {}", manifest.network_uris.join(", "));
        println!(
            "default slug:   {}",
            manifest.default_app_slug().unwrap_or("(none — no entrypoints)")
        );
        println!(
            "default ws url: {}",
            manifest.default_ws_url().unwrap_or_else(|| "(none — no networkUris)".to_string())
        );
    })
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
