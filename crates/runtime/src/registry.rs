// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bundle registry.
//!
//! One registry behind an `Arc<Mutex<...>>`, short lock-held sections, no
//! lock held across an `.await`.

use crate::state::{ActiveBundle, BundleState, WatchEntry};
use brr_core::{ClientId, LauncherBundleId};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    bundles: HashMap<LauncherBundleId, BundleState>,
    last_active_bundle_id: Option<LauncherBundleId>,
}

/// Owns every bundle's state. All mutation is confined to short,
/// non-`.await`-spanning critical sections.
#[derive(Default)]
pub struct BundleRegistry {
    inner: Mutex<Inner>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_active_bundle_id(&self) -> Option<LauncherBundleId> {
        self.inner.lock().last_active_bundle_id.clone()
    }

    pub fn set_last_active_bundle_id(&self, id: LauncherBundleId) {
        self.inner.lock().last_active_bundle_id = Some(id);
    }

    pub fn with_state<R>(&self, id: &LauncherBundleId, f: impl FnOnce(&BundleState) -> R) -> Option<R> {
        self.inner.lock().bundles.get(id).map(f)
    }

    pub fn is_active(&self, id: &LauncherBundleId) -> bool {
        self.with_state(id, |s| matches!(s, BundleState::Active(_))).unwrap_or(false)
    }

    /// Atomically replaces the state at `id`, running the shutdown protocol
    /// on any prior `Active` entry first.
    pub fn set_active(&self, id: LauncherBundleId, mut new_state: BundleState) {
        let mut inner = self.inner.lock();
        if let Some(BundleState::Active(mut prev)) = inner.bundles.insert(id.clone(), BundleState::Idle) {
            prev.shut_down();
        }
        if let BundleState::Active(active) = &mut new_state {
            active.launcher_bundle_id = id.clone();
        }
        inner.bundles.insert(id, new_state);
    }

    /// Cleans up and removes the bundle at `id`; clears `lastActiveBundleId`
    /// if it pointed here.
    pub fn remove(&self, id: &LauncherBundleId) -> bool {
        let mut inner = self.inner.lock();
        let Some(mut prev) = inner.bundles.remove(id) else {
            return false;
        };
        if let BundleState::Active(active) = &mut prev {
            active.shut_down();
        }
        if inner.last_active_bundle_id.as_ref() == Some(id) {
            inner.last_active_bundle_id = None;
        }
        true
    }

    pub fn set_app_slug(&self, id: &LauncherBundleId, slug: String) {
        if let Some(BundleState::Active(active)) = self.inner.lock().bundles.get_mut(id) {
            active.app_slug = slug;
        }
    }

    pub fn set_connection_healthy(&self, id: &LauncherBundleId, healthy: bool) {
        if let Some(BundleState::Active(active)) = self.inner.lock().bundles.get_mut(id) {
            active.connection_healthy = healthy;
        }
    }

    /// Increments the reconnect counter, resetting to 1 on reaching 10.
    pub fn increment_reconnect(&self, id: &LauncherBundleId) -> u32 {
        let mut inner = self.inner.lock();
        let Some(BundleState::Active(active)) = inner.bundles.get_mut(id) else {
            return 0;
        };
        active.reconnect_attempts =
            if active.reconnect_attempts >= 10 { 1 } else { active.reconnect_attempts + 1 };
        active.reconnect_attempts
    }

    pub fn reset_reconnect(&self, id: &LauncherBundleId) {
        if let Some(BundleState::Active(active)) = self.inner.lock().bundles.get_mut(id) {
            active.reconnect_attempts = 0;
        }
    }

    pub fn set_health_task(&self, id: &LauncherBundleId, task: tokio::task::JoinHandle<()>) {
        if let Some(BundleState::Active(active)) = self.inner.lock().bundles.get_mut(id) {
            active.health_task = Some(task);
        }
    }

    pub fn add_watcher(
        &self,
        id: &LauncherBundleId,
        watch_id: String,
        handle: Box<dyn brr_vfs::WatcherHandle>,
        client_id: ClientId,
        path: String,
        is_directory: bool,
    ) {
        if let Some(BundleState::Active(active)) = self.inner.lock().bundles.get_mut(id) {
            if let Some(previous) = active.watchers.insert(watch_id, WatchEntry { handle, client_id, path, is_directory }) {
                previous.handle.stop();
            }
        }
    }

    pub fn remove_watcher(&self, id: &LauncherBundleId, watch_id: &str) -> bool {
        let mut inner = self.inner.lock();
        let Some(BundleState::Active(active)) = inner.bundles.get_mut(id) else {
            return false;
        };
        if let Some(entry) = active.watchers.remove(watch_id) {
            entry.handle.stop();
            true
        } else {
            false
        }
    }

    /// The `(watchId, clientId)` pairs currently registered for `id`, used
    /// by the health controller to re-establish watchers on reconnect.
    pub fn list_watcher_ids(&self, id: &LauncherBundleId) -> Vec<(String, ClientId, String, bool)> {
        let inner = self.inner.lock();
        let Some(BundleState::Active(active)) = inner.bundles.get(id) else {
            return Vec::new();
        };
        active
            .watchers
            .iter()
            .map(|(watch_id, entry)| {
                (watch_id.clone(), entry.client_id.clone(), entry.path.clone(), entry.is_directory)
            })
            .collect()
    }

    pub fn active_vfs(&self, id: &LauncherBundleId) -> Option<std::sync::Arc<dyn brr_vfs::VfsCore>> {
        match self.inner.lock().bundles.get(id) {
            Some(BundleState::Active(active)) => Some(active.vfs.clone()),
            _ => None,
        }
    }
}

impl ActiveBundle {
    /// Constructs a fresh `Active` entry; `launcher_bundle_id` is overwritten
    /// by [`BundleRegistry::set_active`] to the key it's stored under.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bundle_id: String,
        vfs: std::sync::Arc<dyn brr_vfs::VfsCore>,
        manifest: brr_core::Manifest,
        app_slug: String,
        ws_url: String,
    ) -> Self {
        Self {
            bundle_id,
            launcher_bundle_id: LauncherBundleId::from(""),
            vfs,
            manifest,
            app_slug,
            ws_url,
            health_task: None,
            watchers: HashMap::new(),
            connection_healthy: true,
            reconnect_attempts: 0,
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
