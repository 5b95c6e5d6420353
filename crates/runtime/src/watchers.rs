// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The watcher registry's subscribe/forward/re-establish machinery.
//!
//! **Design decision.** On reconnect this implementation re-subscribes
//! every [`crate::state::WatchEntry`]'s underlying handle against the
//! reconnected VFS *and* still broadcasts `watchersReestablished { count
//! }`. An alternative would require clients to re-issue watch requests
//! themselves; re-subscribing automatically is strictly more useful to a
//! client that isn't watching for the broadcast, at the cost of a possible
//! duplicate event right at the reconnect boundary.

use crate::ctx::RuntimeCtx;
use brr_core::{BrrResult, ClientId, LauncherBundleId};
use brr_wire::Reply;
use serde_json::json;
use std::sync::Arc;

/// Subscribes to a single document and forwards every change to `client_id`
/// as a `fileChanged` message.
pub async fn register_document_watch(
    ctx: &Arc<RuntimeCtx>,
    launcher_bundle_id: &LauncherBundleId,
    watch_id: String,
    client_id: ClientId,
    path: String,
) -> BrrResult<()> {
    let vfs = ctx
        .registry
        .active_vfs(launcher_bundle_id)
        .ok_or_else(|| brr_core::BrrError::precondition("Bundle not initialized"))?;
    let (handle, mut rx) = vfs.watch_document(&path).await?;

    ctx.registry.add_watcher(
        launcher_bundle_id,
        watch_id.clone(),
        handle,
        client_id.clone(),
        path,
        false,
    );

    let ctx = Arc::clone(ctx);
    tokio::spawn(async move {
        while let Some(change) = rx.recv().await {
            let reply = Reply::ok(
                "fileChanged",
                None,
                Some(json!({ "watchId": watch_id, "documentData": change.document_data })),
            );
            ctx.clients.send_to(&client_id, reply).await;
        }
    });

    Ok(())
}

/// Subscribes to a directory and forwards every change to `client_id` as a
/// `directoryChanged` message.
pub async fn register_directory_watch(
    ctx: &Arc<RuntimeCtx>,
    launcher_bundle_id: &LauncherBundleId,
    watch_id: String,
    client_id: ClientId,
    path: String,
) -> BrrResult<()> {
    let vfs = ctx
        .registry
        .active_vfs(launcher_bundle_id)
        .ok_or_else(|| brr_core::BrrError::precondition("Bundle not initialized"))?;
    let (handle, mut rx) = vfs.watch_directory(&path).await?;

    ctx.registry.add_watcher(launcher_bundle_id, watch_id.clone(), handle, client_id.clone(), path, true);

    let ctx = Arc::clone(ctx);
    tokio::spawn(async move {
        while let Some(change) = rx.recv().await {
            let reply = Reply::ok(
                "directoryChanged",
                None,
                Some(json!({ "watchId": watch_id, "path": change.path, "changeData": change.change_data })),
            );
            ctx.clients.send_to(&client_id, reply).await;
        }
    });

    Ok(())
}

/// Re-subscribes every watcher currently registered on `launcher_bundle_id`
/// against its (freshly reconnected) VFS. Returns the number re-established.
pub async fn reestablish_all(ctx: &Arc<RuntimeCtx>, launcher_bundle_id: &LauncherBundleId) -> usize {
    let entries = ctx.registry.list_watcher_ids(launcher_bundle_id);
    let mut count = 0;
    for (watch_id, client_id, path, is_directory) in entries {
        let result = if is_directory {
            register_directory_watch(ctx, launcher_bundle_id, watch_id, client_id, path).await
        } else {
            register_document_watch(ctx, launcher_bundle_id, watch_id, client_id, path).await
        };
        match result {
            Ok(()) => count += 1,
            Err(error) => tracing::warn!(%error, "failed to re-establish watcher after reconnect"),
        }
    }
    count
}
