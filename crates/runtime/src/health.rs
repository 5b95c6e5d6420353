// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The health and reconnect controller.
//!
//! A `tokio::spawn`ed `tokio::time::interval` loop owned by a `JoinHandle`
//! the registry holds and aborts on bundle eviction, rather than a
//! cooperative cancellation token — cancellation here is "stop scheduling
//! the next tick", which `JoinHandle::abort` gives for free.

use crate::ctx::RuntimeCtx;
use crate::watchers;
use brr_core::{config, LauncherBundleId};
use brr_wire::Broadcast;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct HealthController;

impl HealthController {
    /// Spawns the per-bundle probe loop. The returned handle is owned by
    /// the registry and aborted when the bundle leaves `Active`.
    pub fn spawn(ctx: Arc<RuntimeCtx>, launcher_bundle_id: LauncherBundleId) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config::health_probe_interval());
            interval.tick().await; // first tick fires immediately; consume it
            loop {
                interval.tick().await;
                probe_once(&ctx, &launcher_bundle_id).await;
            }
        })
    }
}

async fn probe_once(ctx: &Arc<RuntimeCtx>, launcher_bundle_id: &LauncherBundleId) {
    let Some(vfs) = ctx.registry.active_vfs(launcher_bundle_id) else {
        return;
    };
    let was_healthy = ctx
        .registry
        .with_state(launcher_bundle_id, |state| match state {
            crate::state::BundleState::Active(active) => active.connection_healthy,
            _ => true,
        })
        .unwrap_or(true);

    let is_healthy = vfs.is_connected().await;

    if was_healthy && !is_healthy {
        ctx.registry.set_connection_healthy(launcher_bundle_id, false);
        ctx.clients
            .broadcast(Broadcast::Disconnected { launcher_bundle_id: launcher_bundle_id.clone() }.into_reply())
            .await;
        reconnect_loop(ctx, launcher_bundle_id).await;
    } else if !was_healthy && is_healthy {
        ctx.registry.set_connection_healthy(launcher_bundle_id, true);
        ctx.registry.reset_reconnect(launcher_bundle_id);
        tracing::info!(launcher_bundle_id = %launcher_bundle_id, "connection restored");
    }
}

/// Runs reconnect attempts until the connection recovers or the bundle is
/// evicted (at which point the owning `JoinHandle` is aborted and this
/// future is dropped mid-await).
async fn reconnect_loop(ctx: &Arc<RuntimeCtx>, launcher_bundle_id: &LauncherBundleId) {
    loop {
        let attempt = ctx.registry.increment_reconnect(launcher_bundle_id);
        ctx.clients
            .broadcast(
                Broadcast::Reconnecting { launcher_bundle_id: launcher_bundle_id.clone(), attempt }.into_reply(),
            )
            .await;

        let Some(vfs) = ctx.registry.active_vfs(launcher_bundle_id) else {
            return;
        };
        let ws_url = ctx
            .registry
            .with_state(launcher_bundle_id, |state| match state {
                crate::state::BundleState::Active(active) => Some(active.ws_url.clone()),
                _ => None,
            })
            .flatten();
        let Some(ws_url) = ws_url else {
            return;
        };

        let connect_result = vfs.connect_websocket(&ws_url).await;
        tokio::time::sleep(config::reconnect_probe_delay()).await;
        let reconnected = connect_result.is_ok() && vfs.is_connected().await;

        if reconnected {
            ctx.registry.set_connection_healthy(launcher_bundle_id, true);
            ctx.registry.reset_reconnect(launcher_bundle_id);
            ctx.clients
                .broadcast(
                    Broadcast::Reconnected { launcher_bundle_id: launcher_bundle_id.clone() }.into_reply(),
                )
                .await;
            let count = watchers::reestablish_all(ctx, launcher_bundle_id).await;
            ctx.clients
                .broadcast(
                    Broadcast::WatchersReestablished { launcher_bundle_id: launcher_bundle_id.clone(), count }
                        .into_reply(),
                )
                .await;
            return;
        }

        let backoff_ms = (1000u64.saturating_mul(1u64 << (attempt.saturating_sub(1))))
            .min(config::reconnect_backoff_cap().as_millis() as u64);
        tokio::time::sleep(std::time::Duration::from_millis(backoff_ms)).await;
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
