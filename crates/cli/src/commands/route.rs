// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brr route` — classifies one request path the way the router would,
//! without needing a bundle or a running server.

use crate::output::{format_or_json, OutputFormat};
use brr_router::{classify, ClassifyInput, Route};
use serde_json::json;

#[allow(clippy::too_many_arguments)]
pub fn handle(
    path: &str,
    query: &str,
    websocket: bool,
    serve_local: bool,
    dev_proxy_base: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let input = ClassifyInput { path, query, is_websocket_upgrade: websocket, serve_local };
    let route = classify(&input, dev_proxy_base);

    let data = match &route {
        Route::Pass => json!({ "route": "pass" }),
        Route::RuntimeAsset => json!({ "route": "runtimeAsset" }),
        Route::RootReset => json!({ "route": "rootReset" }),
        Route::DevProxy { url } => json!({ "route": "devProxy", "url": url }),
        Route::VfsServe { launcher_bundle_id, app_slug, vfs_path } => json!({
            "route": "vfsServe",
            "launcherBundleId": launcher_bundle_id.as_str(),
            "appSlug": app_slug,
            "vfsPath": vfs_path,
        }),
    };

    format_or_json(format, &data, || println!("{:?}", route))
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
