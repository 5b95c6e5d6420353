// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fetch interceptor.
//!
//! **Design decision.** This crate draws its black-box boundary around the
//! CRDT engine (`VfsFactory`/`BundleParser`) but has no HTTP client of its
//! own, and the surrounding dependency stack doesn't carry one either.
//! Rather than fabricate that dependency for the sake of one
//! rule (`DevProxy`), [`intercept`] only decides *that* a request should
//! be proxied and to what URL — [`FetchAction::DevProxy`] — and leaves
//! performing the upstream request and synthesizing the 502-on-failure
//! response to whatever HTTP server embeds this crate. Every other route
//! (`Pass`, `RuntimeAsset`, `RootReset`, `VfsServe`) is fully resolved
//! here, since serving from the VFS is this crate's actual job.

use crate::ctx::RuntimeCtx;
use brr_core::{config, CacheKey, LauncherBundleId};
use brr_router::{classify, ClassifyInput, Route};
use base64::Engine;
use brr_vfs::{ReadFileResult, VfsCore};
use std::sync::Arc;

/// What the caller (the embedding HTTP server) should do with one request.
pub enum FetchAction {
    /// Let the platform/outer network stack handle the request unmodified.
    PassThrough,
    /// Forward to the dev server at `url`; the caller performs the fetch
    /// and rewrites the response to force no-cache, synthesizing a 502
    /// text/plain response on network failure.
    DevProxy { url: String },
    /// A fully resolved response to serve directly.
    Serve(FetchResponse),
}

/// A response ready to write back to the calling client.
pub struct FetchResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl FetchResponse {
    fn html(status: u16, body: String) -> Self {
        Self { status, content_type: "text/html".to_string(), body: body.into_bytes() }
    }
}

/// Classifies `path`/`query` and resolves it to an action.
pub async fn intercept(
    ctx: &Arc<RuntimeCtx>,
    path: &str,
    query: &str,
    is_websocket_upgrade: bool,
) -> FetchAction {
    let input = ClassifyInput { path, query, is_websocket_upgrade, serve_local: config::serve_local() };
    let dev_proxy_base = config::dev_proxy_base();

    match classify(&input, &dev_proxy_base) {
        Route::Pass | Route::RuntimeAsset => FetchAction::PassThrough,
        Route::RootReset => {
            clear_root_reset_cache(ctx).await;
            FetchAction::PassThrough
        }
        Route::DevProxy { url } => FetchAction::DevProxy { url },
        Route::VfsServe { launcher_bundle_id, app_slug, vfs_path } => {
            FetchAction::Serve(serve_vfs(ctx, launcher_bundle_id, &app_slug, &vfs_path, path).await)
        }
    }
}

/// Best-effort clear of `appSlug`/`bundleBytes` for the currently-remembered
/// bundle. A no-op if no bundle has ever been active.
async fn clear_root_reset_cache(ctx: &Arc<RuntimeCtx>) {
    let Some(namespace) = ctx.registry.last_active_bundle_id() else {
        return;
    };
    for key in [CacheKey::APP_SLUG, CacheKey::BUNDLE_BYTES] {
        if let Err(error) = ctx.cache.delete(namespace.as_str(), key).await {
            tracing::warn!(%error, key, "root reset cache clear failed");
        }
    }
}

async fn serve_vfs(
    ctx: &Arc<RuntimeCtx>,
    launcher_bundle_id: LauncherBundleId,
    app_slug: &str,
    vfs_path: &str,
    request_path: &str,
) -> FetchResponse {
    if !ctx.registry.is_active(&launcher_bundle_id) && !ctx.auto_init.is_resolved() {
        tokio::select! {
            _ = ctx.auto_init.wait() => {}
            _ = tokio::time::sleep(config::auto_init_timeout()) => {}
        }
    }

    let Some(vfs) = ctx.registry.active_vfs(&launcher_bundle_id) else {
        return error_page(&launcher_bundle_id, request_path, "bundle is not initialized");
    };

    let exists = match vfs.exists(vfs_path).await {
        Ok(exists) => exists,
        Err(error) => return error_page(&launcher_bundle_id, request_path, &error.to_string()),
    };

    let read_path = if exists { vfs_path.to_string() } else { format!("{app_slug}/index.html") };

    match vfs.read_file(&read_path).await {
        Ok(result) => response_from_read(result),
        Err(error) => error_page(&launcher_bundle_id, request_path, &error.to_string()),
    }
}

/// Converts a VFS read into an HTTP response.
fn response_from_read(result: ReadFileResult) -> FetchResponse {
    match result.bytes {
        Some(encoded) => {
            let body = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap_or_default();
            let content_type = result.mime.unwrap_or_else(|| "application/octet-stream".to_string());
            FetchResponse { status: 200, content_type, body }
        }
        None => {
            let body = serde_json::to_vec(&result.content).unwrap_or_default();
            FetchResponse { status: 200, content_type: "application/json".to_string(), body }
        }
    }
}

/// The literal HTML error page template, kept as a single template rather
/// than fragmented across functions.
fn error_page(launcher_bundle_id: &LauncherBundleId, path: &str, message: &str) -> FetchResponse {
    FetchResponse::html(
        500,
        format!(
            "<!doctype html><html><body>\
             <h1>Bundle unavailable</h1>\
             <p>Bundle: {launcher_bundle_id}</p>\
             <p>Path: {path}</p>\
             <p>Error: {message}</p>\
             <button onclick=\"location.reload()\">Reload</button>\
             </body></html>"
        ),
    )
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
