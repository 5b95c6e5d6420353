// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! VFS path resolution.

/// Resolves the remainder of a `/space/<launcherBundleId>/<appSlug>/...`
/// request into an absolute VFS path.
///
/// Strips a redundant leading `<launcherBundleId>/<appSlug>` or bare
/// `<appSlug>` segment pair if `remaining` still carries one (the legacy
/// single-segment form some older clients send); an empty or
/// trailing-slash-only remainder resolves to the app's `index.html`.
pub fn resolve_vfs_path(launcher_bundle_id: &str, app_slug: &str, remaining: &str) -> String {
    let mut segments: Vec<&str> = remaining.split('/').filter(|s| !s.is_empty()).collect();

    if segments.first() == Some(&launcher_bundle_id) && segments.get(1) == Some(&app_slug) {
        segments.drain(0..2);
    } else if segments.first() == Some(&app_slug) {
        segments.remove(0);
    }

    if segments.is_empty() {
        format!("{app_slug}/index.html")
    } else {
        format!("{app_slug}/{}", segments.join("/"))
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
