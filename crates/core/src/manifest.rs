// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bundle manifest — header metadata consumed from the VFS Core.

use serde::{Deserialize, Serialize};

/// `{ rootId, entrypoints, networkUris }` as read from a parsed bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Stable CRDT root hash identity, used for logging only.
    pub root_id: String,
    /// App slugs contained in the bundle; `entrypoints[0]` is the default.
    pub entrypoints: Vec<String>,
    /// Candidate sync endpoints; `networkUris[0]` (http→ws) is the default.
    pub network_uris: Vec<String>,
}

impl Manifest {
    /// `entrypoints[0]`, the default app slug for this bundle.
    pub fn default_app_slug(&self) -> Option<&str> {
        self.entrypoints.first().map(String::as_str)
    }

    /// `networkUris[0]` transformed http(s)→ws(s), the default sync endpoint.
    pub fn default_ws_url(&self) -> Option<String> {
        self.network_uris.first().map(|uri| http_to_ws(uri))
    }
}

/// Transform an `http(s)://` URI into the equivalent `ws(s)://` one.
///
/// Leaves already-`ws`/`wss` URIs untouched and leaves anything else as-is —
/// the manifest contract doesn't guarantee the scheme, and silently mangling
/// an unrecognized one would be worse than passing it through.
pub fn http_to_ws(uri: &str) -> String {
    if let Some(rest) = uri.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = uri.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        uri.to_string()
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
