// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-bundle tagged state machine.

use brr_core::{BrrError, ClientId, LauncherBundleId, Manifest, SharedOnce};
use brr_vfs::VfsCore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The outcome a `Loading` state's completion signal resolves to.
pub type LoadOutcome = Result<(), String>;

/// A single registered watch: the live subscription plus the client it
/// reports change events to.
pub struct WatchEntry {
    pub handle: Box<dyn brr_vfs::WatcherHandle>,
    pub client_id: ClientId,
    pub path: String,
    pub is_directory: bool,
}

/// The four bundle statuses. A closed sum so pattern matching replaces ad
/// hoc status-string checks.
pub enum BundleState {
    Idle,
    Loading { bundle_id: String, completion: SharedOnce<LoadOutcome> },
    Active(Box<ActiveBundle>),
    Error { error: BrrError },
}

/// The fields carried by an `Active` bundle.
pub struct ActiveBundle {
    pub bundle_id: String,
    pub launcher_bundle_id: LauncherBundleId,
    pub vfs: Arc<dyn VfsCore>,
    pub manifest: Manifest,
    pub app_slug: String,
    pub ws_url: String,
    pub health_task: Option<JoinHandle<()>>,
    pub watchers: HashMap<String, WatchEntry>,
    pub connection_healthy: bool,
    pub reconnect_attempts: u32,
}

impl ActiveBundle {
    /// Cancels the health timer and stops every watcher, continuing past
    /// individual failures.
    pub fn shut_down(&mut self) {
        if let Some(task) = self.health_task.take() {
            task.abort();
        }
        for (watch_id, entry) in self.watchers.drain() {
            entry.handle.stop();
            tracing::debug!(watch_id, "stopped watcher during bundle shutdown");
        }
    }
}

impl std::fmt::Debug for BundleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleState::Idle => write!(f, "Idle"),
            BundleState::Loading { bundle_id, .. } => {
                f.debug_struct("Loading").field("bundle_id", bundle_id).finish()
            }
            BundleState::Active(active) => f
                .debug_struct("Active")
                .field("bundle_id", &active.bundle_id)
                .field("launcher_bundle_id", &active.launcher_bundle_id)
                .field("app_slug", &active.app_slug)
                .finish(),
            BundleState::Error { error } => f.debug_struct("Error").field("error", error).finish(),
        }
    }
}
