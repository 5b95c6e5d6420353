// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The auto-init orchestrator.
//!
//! Runs once at process startup, on its own task: attempt cache recovery,
//! then resolve [`RuntimeCtx::auto_init`] so every fetch and message handler
//! racing it can stop waiting. Follows the same try-then-clear-on-failure
//! shape as a daemon's on-disk state recovery step, run before the process
//! starts accepting connections.

use crate::ctx::RuntimeCtx;
use crate::loader;
use brr_core::{AppSlugBlob, CacheKey, LastActiveBundleIdBlob, LauncherBundleId, WsUrlBlob, RESERVED_RUNTIME_BUNDLE_ID};
use brr_wire::Broadcast;
use std::sync::Arc;

/// Attempts cache recovery, then publishes the completion signal.
///
/// Idempotent only in the sense that [`brr_core::SharedOnce::complete`] is a
/// no-op past the first call; callers should invoke this exactly once per
/// process.
pub async fn run(ctx: Arc<RuntimeCtx>) {
    let outcome = recover(&ctx).await;
    if let Err(reason) = outcome {
        clear_all_cache(&ctx).await;
        ctx.clients.broadcast(Broadcast::NeedsReinit { reason }.into_reply()).await;
    }
    ctx.auto_init.complete(());
}

/// Tries to reconstruct an `Active` bundle entirely from cached blobs, with
/// no network round-trip for the manifest, reusing the same load pipeline a
/// fresh load goes through.
async fn recover(ctx: &Arc<RuntimeCtx>) -> Result<(), String> {
    let Some(launcher_bundle_id) = last_active_bundle_id(ctx).await else {
        return Ok(());
    };
    let namespace = launcher_bundle_id.as_str();

    let Some(bundle_bytes) = read_blob(ctx, namespace, CacheKey::BUNDLE_BYTES).await else {
        return Ok(());
    };
    // appSlug itself isn't threaded any further: the recovered manifest's
    // own `entrypoints[0]` is what `ActiveBundle` derives `app_slug` from,
    // same as a fresh load. Its presence is still part of the three-blob
    // recovery precondition.
    if read_json_blob::<AppSlugBlob>(ctx, namespace, CacheKey::APP_SLUG).await.is_none() {
        return Ok(());
    }
    let ws_url_blob = read_json_blob::<WsUrlBlob>(ctx, namespace, CacheKey::WS_URL).await;

    let manifest = ctx
        .bundle_parser
        .parse(&bundle_bytes)
        .await
        .map_err(|error| format!("auto-init manifest parse failed: {error}"))?;

    let reply = loader::load_bundle(
        ctx,
        launcher_bundle_id,
        Some(bundle_bytes),
        ws_url_blob.map(|blob| blob.url),
        Some(manifest),
    )
    .await;

    if reply.success {
        Ok(())
    } else {
        Err(reply.error.unwrap_or_else(|| "auto-init recovery failed".to_string()))
    }
}

async fn last_active_bundle_id(ctx: &Arc<RuntimeCtx>) -> Option<LauncherBundleId> {
    if let Some(existing) = ctx.registry.last_active_bundle_id() {
        return Some(existing);
    }
    let blob =
        read_json_blob::<LastActiveBundleIdBlob>(ctx, RESERVED_RUNTIME_BUNDLE_ID, CacheKey::LAST_ACTIVE_BUNDLE_ID)
            .await?;
    Some(LauncherBundleId::from(blob.id))
}

async fn read_blob(ctx: &Arc<RuntimeCtx>, namespace: &str, key: &str) -> Option<Vec<u8>> {
    match ctx.cache.get(namespace, key).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(%error, namespace, key, "auto-init cache read failed");
            None
        }
    }
}

async fn read_json_blob<T: serde::de::DeserializeOwned>(ctx: &Arc<RuntimeCtx>, namespace: &str, key: &str) -> Option<T> {
    let bytes = read_blob(ctx, namespace, key).await?;
    serde_json::from_slice(&bytes).ok()
}

/// Clears every blob for the recovery candidate plus the reserved pointer
/// that named it, so a corrupt cache doesn't keep failing recovery forever.
async fn clear_all_cache(ctx: &Arc<RuntimeCtx>) {
    if let Some(namespace) = last_active_bundle_id(ctx).await {
        if let Err(error) = ctx.cache.clear_all(namespace.as_str()).await {
            tracing::warn!(%error, "auto-init cache clear failed");
        }
    }
    if let Err(error) = ctx.cache.delete(RESERVED_RUNTIME_BUNDLE_ID, CacheKey::LAST_ACTIVE_BUNDLE_ID).await {
        tracing::warn!(%error, "auto-init reserved pointer clear failed");
    }
}

#[cfg(test)]
#[path = "autoinit_tests.rs"]
mod tests;
