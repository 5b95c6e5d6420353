// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn root_path_classifies_as_root_reset() {
    handle("/", "", false, false, "http://localhost:4001", OutputFormat::Text).unwrap();
}

#[test]
fn vfs_path_classifies_with_resolved_segments() {
    handle("/space/bundle-1/app/index.html", "", false, false, "http://localhost:4001", OutputFormat::Json)
        .unwrap();
}

#[test]
fn websocket_upgrade_always_passes_through() {
    handle("/space/bundle-1/app/", "", true, false, "http://localhost:4001", OutputFormat::Text).unwrap();
}
