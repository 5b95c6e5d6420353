// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incoming client messages.

use brr_core::{LauncherBundleId, WatchId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ type, id, launcherBundleId?, ...payload }` — the full envelope of a
/// message from a specific client.
///
/// `id` and `launcherBundleId` are lifted out of the tagged [`Operation`]
/// enum into common fields via `#[serde(flatten)]` so every operation kind
/// doesn't have to repeat them.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub id: Option<String>,
    #[serde(rename = "launcherBundleId", default)]
    pub launcher_bundle_id: Option<LauncherBundleId>,
    #[serde(flatten)]
    pub op: Operation,
}

/// The lifecycle operations exempt from the "bundle must be loaded"
/// precondition gate.
pub const LIFECYCLE_WHITELIST: &[&str] = &[
    "init",
    "loadBundle",
    "unloadBundle",
    "initializeFromUrl",
    "initializeFromBytes",
    "getServerUrl",
    "ping",
    "setAppSlug",
];

/// The operation kinds the dispatcher demultiplexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Operation {
    // Lifecycle
    Init,
    LoadBundle {
        #[serde(default, with = "crate::base64_bytes::opt")]
        bundle_bytes: Option<Vec<u8>>,
        #[serde(default)]
        ws_url: Option<String>,
    },
    UnloadBundle,
    InitializeFromUrl {
        url: String,
    },
    InitializeFromBytes {
        #[serde(with = "crate::base64_bytes")]
        bundle_bytes: Vec<u8>,
    },
    GetServerUrl,
    GetManifest,
    Ping,
    SetAppSlug {
        slug: String,
    },

    // Files
    ReadFile {
        path: String,
    },
    WriteFile {
        path: String,
        content: Value,
        #[serde(default)]
        create: bool,
    },
    DeleteFile {
        path: String,
    },
    Rename {
        from: String,
        to: String,
    },
    Exists {
        path: String,
    },
    PatchFile {
        path: String,
        json_path: String,
        value: Value,
    },
    UpdateFile {
        path: String,
        content: Value,
    },
    ListDirectory {
        path: String,
    },

    // Bytes
    ToBytes,
    ForkToBytes,

    // Watchers
    WatchFile {
        watch_id: WatchId,
        path: String,
    },
    UnwatchFile {
        watch_id: WatchId,
    },
    WatchDirectory {
        watch_id: WatchId,
        path: String,
    },
    UnwatchDirectory {
        watch_id: WatchId,
    },
}

impl Operation {
    /// The wire `type` string for this operation, used both for
    /// serialization and for the precondition-gate whitelist check.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::LoadBundle { .. } => "loadBundle",
            Operation::UnloadBundle => "unloadBundle",
            Operation::InitializeFromUrl { .. } => "initializeFromUrl",
            Operation::InitializeFromBytes { .. } => "initializeFromBytes",
            Operation::GetServerUrl => "getServerUrl",
            Operation::GetManifest => "getManifest",
            Operation::Ping => "ping",
            Operation::SetAppSlug { .. } => "setAppSlug",
            Operation::ReadFile { .. } => "readFile",
            Operation::WriteFile { .. } => "writeFile",
            Operation::DeleteFile { .. } => "deleteFile",
            Operation::Rename { .. } => "rename",
            Operation::Exists { .. } => "exists",
            Operation::PatchFile { .. } => "patchFile",
            Operation::UpdateFile { .. } => "updateFile",
            Operation::ListDirectory { .. } => "listDirectory",
            Operation::ToBytes => "toBytes",
            Operation::ForkToBytes => "forkToBytes",
            Operation::WatchFile { .. } => "watchFile",
            Operation::UnwatchFile { .. } => "unwatchFile",
            Operation::WatchDirectory { .. } => "watchDirectory",
            Operation::UnwatchDirectory { .. } => "unwatchDirectory",
        }
    }

    /// Whether this operation bypasses the "bundle loaded" precondition
    /// gate.
    pub fn is_lifecycle_whitelisted(&self) -> bool {
        LIFECYCLE_WHITELIST.contains(&self.kind())
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
