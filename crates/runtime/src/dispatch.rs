// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The client-scoped message dispatcher.
//!
//! One call per inbound [`Request`]; never panics on a malformed or
//! out-of-order message — every failure path becomes an `{ success: false,
//! error }` [`Reply`] to the originating client instead of crashing the
//! loop, via the familiar match-over-enum command dispatch shape.

use crate::ctx::RuntimeCtx;
use crate::loader;
use crate::watchers;
use base64::Engine;
use brr_core::{BrrError, BrrResult, ClientId, LauncherBundleId};
use brr_vfs::VfsCore;
use brr_wire::{Broadcast, Operation, Reply, Request};
use serde_json::json;
use std::sync::Arc;

/// Handles one message from `client_id`, returning the reply to send back
/// to it. Broadcasts (e.g. `ready`, `watchersReestablished`) are sent as a
/// side effect through [`RuntimeCtx::clients`] and are not part of the
/// return value.
pub async fn dispatch(ctx: &Arc<RuntimeCtx>, client_id: &ClientId, request: Request) -> Reply {
    let kind = request.op.kind();
    let id = request.id.clone();
    let raw_launcher_bundle_id = request.launcher_bundle_id.clone();
    let effective_id = raw_launcher_bundle_id.clone().or_else(|| ctx.registry.last_active_bundle_id());

    if !request.op.is_lifecycle_whitelisted() {
        let Some(active_id) = effective_id.clone() else {
            return Reply::err(kind, id, "No bundle context");
        };
        if !ctx.registry.is_active(&active_id) {
            return Reply::err(kind, id, "Bundle not initialized");
        }
    }

    match request.op {
        Operation::Init => handle_init(ctx, id).await,
        Operation::Ping => handle_ping(ctx, id).await,
        Operation::LoadBundle { bundle_bytes, ws_url } => {
            handle_load_bundle(ctx, id, raw_launcher_bundle_id, bundle_bytes, ws_url).await
        }
        Operation::UnloadBundle => handle_unload_bundle(ctx, id, raw_launcher_bundle_id),
        Operation::InitializeFromUrl { .. } => Reply::err(
            kind,
            id,
            "initializeFromUrl is not supported: this deployment has no outbound HTTP fetcher, pass \
             bundleBytes via initializeFromBytes or loadBundle instead",
        ),
        Operation::InitializeFromBytes { bundle_bytes } => {
            handle_load_bundle(ctx, id, raw_launcher_bundle_id, Some(bundle_bytes), None).await
        }
        Operation::GetServerUrl => Reply::ok(kind, id, Some(json!({ "serverUrl": ctx.server_url }))),
        Operation::SetAppSlug { slug } => handle_set_app_slug(ctx, id, raw_launcher_bundle_id, slug),

        Operation::GetManifest => handle_get_manifest(ctx, id, effective_id),
        Operation::ReadFile { path } => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                let result = vfs.read_file(&path).await?;
                Ok(json!({ "content": result.content, "bytes": result.bytes, "mime": result.mime }))
            })
            .await
        }
        Operation::WriteFile { path, content, create } => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                if create {
                    vfs.create_file(&path, content).await?;
                } else {
                    vfs.set_file(&path, content).await?;
                }
                Ok(json!({}))
            })
            .await
        }
        Operation::DeleteFile { path } => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                vfs.delete_file(&path).await?;
                Ok(json!({}))
            })
            .await
        }
        Operation::Rename { from, to } => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                vfs.rename(&from, &to).await?;
                Ok(json!({}))
            })
            .await
        }
        Operation::Exists { path } => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                Ok(json!({ "exists": vfs.exists(&path).await? }))
            })
            .await
        }
        Operation::PatchFile { path, json_path, value } => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                vfs.patch_file(&path, &json_path, value).await?;
                Ok(json!({}))
            })
            .await
        }
        Operation::UpdateFile { path, content } => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                vfs.update_file(&path, content).await?;
                Ok(json!({}))
            })
            .await
        }
        Operation::ListDirectory { path } => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                Ok(json!({ "entries": vfs.list_directory(&path).await? }))
            })
            .await
        }
        Operation::ToBytes => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                Ok(json!({ "bytes": base64_encode(&vfs.to_bytes().await?) }))
            })
            .await
        }
        Operation::ForkToBytes => {
            with_active_vfs(ctx, id, kind, effective_id, |vfs, _| async move {
                Ok(json!({ "bytes": base64_encode(&vfs.fork_to_bytes().await?) }))
            })
            .await
        }
        Operation::WatchFile { watch_id, path } => {
            let Some(active_id) = effective_id else {
                return Reply::err(kind, id, "No bundle context");
            };
            let result =
                watchers::register_document_watch(ctx, &active_id, watch_id.to_string(), client_id.clone(), path)
                    .await;
            reply_from_result(kind, id, result.map(|()| json!({})))
        }
        Operation::WatchDirectory { watch_id, path } => {
            let Some(active_id) = effective_id else {
                return Reply::err(kind, id, "No bundle context");
            };
            let result =
                watchers::register_directory_watch(ctx, &active_id, watch_id.to_string(), client_id.clone(), path)
                    .await;
            reply_from_result(kind, id, result.map(|()| json!({})))
        }
        Operation::UnwatchFile { watch_id } | Operation::UnwatchDirectory { watch_id } => {
            let Some(active_id) = effective_id else {
                return Reply::err(kind, id, "No bundle context");
            };
            ctx.registry.remove_watcher(&active_id, watch_id.as_str());
            Reply::ok(kind, id, Some(json!({})))
        }
    }
}

fn base64_encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn reply_from_result(kind: &'static str, id: Option<String>, result: BrrResult<serde_json::Value>) -> Reply {
    match result {
        Ok(data) => Reply::ok(kind, id, Some(data)),
        Err(error) => Reply::err(kind, id, error),
    }
}

/// Resolves the effective bundle's VFS and runs `op` against it, converting
/// `BrrError`s into `{ success: false, error }` replies uniformly.
async fn with_active_vfs<F, Fut>(
    ctx: &Arc<RuntimeCtx>,
    id: Option<String>,
    kind: &'static str,
    effective_id: Option<LauncherBundleId>,
    op: F,
) -> Reply
where
    F: FnOnce(Arc<dyn VfsCore>, LauncherBundleId) -> Fut,
    Fut: std::future::Future<Output = BrrResult<serde_json::Value>>,
{
    let Some(active_id) = effective_id else {
        return Reply::err(kind, id, "No bundle context");
    };
    let Some(vfs) = ctx.registry.active_vfs(&active_id) else {
        return Reply::err(kind, id, BrrError::precondition("Bundle not initialized"));
    };
    reply_from_result(kind, id, op(vfs, active_id).await)
}

async fn handle_init(ctx: &Arc<RuntimeCtx>, id: Option<String>) -> Reply {
    let needs_bundle = ctx.registry.last_active_bundle_id().is_none();
    Reply::ok("init", id, Some(json!({ "needsBundle": needs_bundle })))
}

/// `ping` both replies and broadcasts `ready` to every client.
async fn handle_ping(ctx: &Arc<RuntimeCtx>, id: Option<String>) -> Reply {
    let needs_bundle = ctx
        .registry
        .last_active_bundle_id()
        .map(|last| !ctx.registry.is_active(&last))
        .unwrap_or(true);
    ctx.clients.broadcast(Broadcast::Ready { needs_bundle }.into_reply()).await;
    Reply::ok("ping", id, Some(json!({ "needsBundle": needs_bundle })))
}

async fn handle_load_bundle(
    ctx: &Arc<RuntimeCtx>,
    id: Option<String>,
    launcher_bundle_id: Option<LauncherBundleId>,
    bundle_bytes: Option<Vec<u8>>,
    ws_url: Option<String>,
) -> Reply {
    let Some(launcher_bundle_id) = launcher_bundle_id else {
        return Reply::err("loadBundle", id, "launcherBundleId is required");
    };
    let outcome = loader::load_bundle(ctx, launcher_bundle_id, bundle_bytes, ws_url, None).await;
    if outcome.success {
        Reply::ok("loadBundle", id, Some(json!({ "skipped": outcome.skipped })))
    } else {
        Reply::err("loadBundle", id, outcome.error.unwrap_or_else(|| "load failed".to_string()))
    }
}

fn handle_unload_bundle(ctx: &Arc<RuntimeCtx>, id: Option<String>, launcher_bundle_id: Option<LauncherBundleId>) -> Reply {
    let Some(target) = launcher_bundle_id.or_else(|| ctx.registry.last_active_bundle_id()) else {
        return Reply::err("unloadBundle", id, "No bundle context");
    };
    let removed = ctx.registry.remove(&target);
    Reply::ok("unloadBundle", id, Some(json!({ "removed": removed })))
}

fn handle_get_manifest(ctx: &Arc<RuntimeCtx>, id: Option<String>, effective_id: Option<LauncherBundleId>) -> Reply {
    let Some(active_id) = effective_id else {
        return Reply::err("getManifest", id, "No bundle context");
    };
    let manifest = ctx.registry.with_state(&active_id, |state| match state {
        crate::state::BundleState::Active(active) => Some(active.manifest.clone()),
        _ => None,
    });
    match manifest.flatten() {
        Some(manifest) => Reply::ok("getManifest", id, Some(json!({ "manifest": manifest }))),
        None => Reply::err("getManifest", id, BrrError::precondition("Bundle not initialized")),
    }
}

fn handle_set_app_slug(
    ctx: &Arc<RuntimeCtx>,
    id: Option<String>,
    launcher_bundle_id: Option<LauncherBundleId>,
    slug: String,
) -> Reply {
    let Some(target) = launcher_bundle_id.or_else(|| ctx.registry.last_active_bundle_id()) else {
        return Reply::err("setAppSlug", id, "No bundle context");
    };
    ctx.registry.set_app_slug(&target, slug);
    Reply::ok("setAppSlug", id, Some(json!({})))
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
