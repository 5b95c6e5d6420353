// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bundle loader pipeline.
//!
//! The once-init guard some implementations need for their embedded engine
//! has no counterpart here: the CRDT engine is consumed as an opaque black
//! box behind [`brr_vfs::VfsFactory`], so initialization is that trait's
//! own concern rather than a second guard duplicated in the loader.

use crate::ctx::RuntimeCtx;
use crate::health::HealthController;
use crate::registry::ActiveBundle;
use crate::state::{BundleState, LoadOutcome};
use brr_core::{
    AppSlugBlob, BrrError, BrrResult, CacheKey, LastActiveBundleIdBlob, LauncherBundleId, Manifest,
    NamespaceBlob, SharedOnce, WsUrlBlob, RESERVED_RUNTIME_BUNDLE_ID,
};
use brr_vfs::{StorageBackend, VfsStorageConfig};
use std::sync::Arc;

/// What `loadBundle` reports back to the caller.
pub struct LoadReply {
    pub success: bool,
    pub skipped: bool,
    pub error: Option<String>,
}

/// Runs the full `loadBundle` pipeline for one `(launcherBundleId,
/// bundleBytes)` pair, coalescing concurrent callers for the same id.
pub async fn load_bundle(
    ctx: &Arc<RuntimeCtx>,
    launcher_bundle_id: LauncherBundleId,
    bundle_bytes: Option<Vec<u8>>,
    ws_url_override: Option<String>,
    cached_manifest: Option<Manifest>,
) -> LoadReply {
    // Step 1: idempotency guard — already Active at this id.
    if ctx.registry.is_active(&launcher_bundle_id) {
        ctx.registry.set_last_active_bundle_id(launcher_bundle_id.clone());
        persist_last_active(ctx, &launcher_bundle_id).await;
        return LoadReply { success: true, skipped: true, error: None };
    }

    // Step 2: a load for this id is already in flight — await it.
    let existing_completion =
        ctx.registry.with_state(&launcher_bundle_id, |state| match state {
            BundleState::Loading { completion, .. } => Some(completion.clone()),
            _ => None,
        });
    if let Some(completion) = existing_completion.flatten() {
        return match completion.wait().await {
            Ok(()) => LoadReply { success: true, skipped: true, error: None },
            Err(error) => LoadReply { success: false, skipped: true, error: Some(error) },
        };
    }

    let Some(bundle_bytes) = bundle_bytes else {
        return LoadReply {
            success: false,
            skipped: false,
            error: Some("loadBundle requires bundleBytes when no load is in flight".to_string()),
        };
    };

    // Step 3: transition to Loading and publish the completion signal.
    let completion: SharedOnce<LoadOutcome> = SharedOnce::new();
    let bundle_id_placeholder = launcher_bundle_id.as_str().to_string();
    ctx.registry.set_active(
        launcher_bundle_id.clone(),
        BundleState::Loading { bundle_id: bundle_id_placeholder, completion: completion.clone() },
    );

    match run_pipeline(ctx, &launcher_bundle_id, &bundle_bytes, ws_url_override, cached_manifest).await {
        Ok(()) => {
            completion.complete(Ok(()));
            LoadReply { success: true, skipped: false, error: None }
        }
        Err(error) => {
            let message = error.to_string();
            ctx.registry.set_active(launcher_bundle_id, BundleState::Error { error });
            completion.complete(Err(message.clone()));
            LoadReply { success: false, skipped: false, error: Some(message) }
        }
    }
}

async fn run_pipeline(
    ctx: &Arc<RuntimeCtx>,
    launcher_bundle_id: &LauncherBundleId,
    bundle_bytes: &[u8],
    ws_url_override: Option<String>,
    cached_manifest: Option<Manifest>,
) -> BrrResult<()> {
    // Step 5: manifest acquisition.
    let manifest = match cached_manifest {
        Some(manifest) => manifest,
        None => ctx.bundle_parser.parse(bundle_bytes).await?,
    };

    // Step 6: VFS instantiation.
    let storage = VfsStorageConfig { backend: StorageBackend::IndexedDb, namespace: launcher_bundle_id.to_string() };
    let vfs = ctx.vfs_factory.from_bytes(bundle_bytes, storage).await?;

    // Step 7: websocket URL resolution.
    let ws_url = ws_url_override
        .or_else(|| manifest.default_ws_url())
        .ok_or_else(|| BrrError::bundle("no websocket URL available from override or manifest"))?;

    // Step 8: connect — failure here is fatal to the whole load.
    vfs.connect_websocket(&ws_url).await?;

    // Step 9: PathIndex sync wait — first change event or 1s quiet timeout.
    let (watch_handle, mut rx) = vfs.watch_directory("/").await?;
    tokio::select! {
        _ = rx.recv() => {}
        _ = tokio::time::sleep(brr_core::config::path_index_sync_timeout()) => {}
    }
    watch_handle.stop();

    let app_slug = manifest
        .default_app_slug()
        .ok_or_else(|| BrrError::bundle("manifest has no entrypoints"))?
        .to_string();

    // Step 10: commit.
    let mut active = ActiveBundle::new(manifest.root_id.clone(), vfs, manifest, app_slug, ws_url);
    active.launcher_bundle_id = launcher_bundle_id.clone();
    ctx.registry.set_active(launcher_bundle_id.clone(), BundleState::Active(Box::new(active)));
    ctx.registry.set_last_active_bundle_id(launcher_bundle_id.clone());
    persist_bundle_state(ctx, launcher_bundle_id, bundle_bytes).await;

    // Step 11: start the health monitor.
    let task = HealthController::spawn(Arc::clone(ctx), launcher_bundle_id.clone());
    ctx.registry.set_health_task(launcher_bundle_id, task);

    Ok(())
}

async fn persist_bundle_state(ctx: &RuntimeCtx, launcher_bundle_id: &LauncherBundleId, bundle_bytes: &[u8]) {
    let namespace = launcher_bundle_id.as_str();
    let (app_slug, ws_url) = ctx
        .registry
        .with_state(launcher_bundle_id, |state| match state {
            BundleState::Active(active) => Some((active.app_slug.clone(), active.ws_url.clone())),
            _ => None,
        })
        .flatten()
        .unwrap_or_default();

    log_cache_io(ctx.cache.put(namespace, CacheKey::BUNDLE_BYTES, bundle_bytes.to_vec()).await);
    log_cache_io(
        ctx.cache
            .put(namespace, CacheKey::NAMESPACE, blob_bytes(&NamespaceBlob { namespace: namespace.to_string() }))
            .await,
    );
    log_cache_io(ctx.cache.put(namespace, CacheKey::APP_SLUG, blob_bytes(&AppSlugBlob { slug: app_slug })).await);
    log_cache_io(ctx.cache.put(namespace, CacheKey::WS_URL, blob_bytes(&WsUrlBlob { url: ws_url })).await);
    persist_last_active(ctx, launcher_bundle_id).await;
}

/// `lastActiveBundleId` is a single process-wide pointer designating the
/// default bundle context, so unlike the other three blobs it lives under
/// the fixed reserved namespace
/// rather than the bundle's own — auto-init recovery has no other way to
/// discover which bundle to recover without already knowing its id.
async fn persist_last_active(ctx: &RuntimeCtx, launcher_bundle_id: &LauncherBundleId) {
    log_cache_io(
        ctx.cache
            .put(
                RESERVED_RUNTIME_BUNDLE_ID,
                CacheKey::LAST_ACTIVE_BUNDLE_ID,
                blob_bytes(&LastActiveBundleIdBlob { id: launcher_bundle_id.to_string() }),
            )
            .await,
    );
}

fn blob_bytes(value: &impl serde::Serialize) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

/// Cache errors are logged and never fatal.
fn log_cache_io(result: BrrResult<()>) {
    if let Err(error) = result {
        tracing::warn!(%error, "cache write failed");
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
