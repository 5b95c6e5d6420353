// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! URL classification: the ordered rules that decide how an incoming
//! request is routed.

use crate::path::resolve_vfs_path;
use brr_core::{LauncherBundleId, RESERVED_RUNTIME_BUNDLE_ID};

/// The fixed set of reserved runtime asset filenames served directly from
/// the origin rather than the VFS.
pub const RESERVED_RUNTIME_ASSETS: [&str; 4] =
    ["/favicon.ico", "/manifest.webmanifest", "/robots.txt", "/service-worker.js"];

const FONT_EXTENSIONS: [&str; 4] = [".woff", ".woff2", ".ttf", ".otf"];

const DEV_PROXY_PREFIXES: [&str; 6] =
    ["@vite", "@react-refresh", "@fs/", "src/", "node_modules", "__vite__"];

/// The result of classifying one incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Let the platform network stack handle the request unmodified.
    Pass,
    /// Forward to the local dev server, rewriting cache headers on reply.
    DevProxy { url: String },
    /// A reserved runtime asset; also passed through but classified for
    /// diagnostics distinct from an ordinary [`Route::Pass`].
    RuntimeAsset,
    /// The bare origin or `/space` root; also clears `appSlug`/`bundleBytes`.
    RootReset,
    /// Serve `vfs_path` from `launcher_bundle_id`'s VFS under `app_slug`.
    VfsServe { launcher_bundle_id: LauncherBundleId, app_slug: String, vfs_path: String },
}

/// The inputs a classification decision is a pure function of.
#[derive(Debug, Clone)]
pub struct ClassifyInput<'a> {
    pub path: &'a str,
    pub query: &'a str,
    pub is_websocket_upgrade: bool,
    pub serve_local: bool,
}

fn query_has(query: &str, key: &str) -> bool {
    query.split('&').any(|pair| pair.split('=').next() == Some(key))
}

fn has_font_extension(path: &str) -> bool {
    FONT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn is_root_reset_path(path: &str) -> bool {
    matches!(path, "" | "/" | "/space" | "/space/")
}

fn space_segments(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix("/space/")?;
    Some(rest.split('/').filter(|s| !s.is_empty()).collect())
}

/// Classifies one request per the ordered rules above.
pub fn classify(input: &ClassifyInput<'_>, dev_proxy_base: &str) -> Route {
    if input.is_websocket_upgrade {
        return Route::Pass;
    }

    if is_root_reset_path(input.path) {
        return Route::RootReset;
    }

    let is_runtime_prefixed =
        space_segments(input.path).map(|segs| segs.first() == Some(&RESERVED_RUNTIME_BUNDLE_ID)).unwrap_or(false);

    if RESERVED_RUNTIME_ASSETS.contains(&input.path)
        || (is_runtime_prefixed && (query_has(input.query, "bundleId") || has_font_extension(input.path)))
    {
        return Route::RuntimeAsset;
    }

    if is_runtime_prefixed {
        return Route::Pass;
    }

    if input.serve_local {
        let trimmed = input.path.trim_start_matches('/');
        let matches_prefix = DEV_PROXY_PREFIXES.iter().any(|p| trimmed.starts_with(p));
        if matches_prefix || query_has(input.query, "t") {
            let search = if input.query.is_empty() { String::new() } else { format!("?{}", input.query) };
            return Route::DevProxy { url: format!("{dev_proxy_base}{}{search}", input.path) };
        }
    }

    match space_segments(input.path).as_deref() {
        Some([launcher_bundle_id, app_slug, rest @ ..]) => Route::VfsServe {
            launcher_bundle_id: LauncherBundleId::from(*launcher_bundle_id),
            app_slug: (*app_slug).to_string(),
            vfs_path: resolve_vfs_path(launcher_bundle_id, app_slug, &rest.join("/")),
        },
        _ => Route::Pass,
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
