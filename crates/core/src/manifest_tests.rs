// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn manifest(entrypoints: &[&str], network_uris: &[&str]) -> Manifest {
    Manifest {
        root_id: "root-abc".to_string(),
        entrypoints: entrypoints.iter().map(|s| s.to_string()).collect(),
        network_uris: network_uris.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn http_to_ws_transforms_both_schemes() {
    assert_eq!(http_to_ws("http://sync.example.com/ws"), "ws://sync.example.com/ws");
    assert_eq!(http_to_ws("https://sync.example.com/ws"), "wss://sync.example.com/ws");
}

#[test]
fn http_to_ws_leaves_unrecognized_schemes_untouched() {
    assert_eq!(http_to_ws("ws://already.example.com"), "ws://already.example.com");
    assert_eq!(http_to_ws("ftp://odd.example.com"), "ftp://odd.example.com");
}

#[test]
fn default_app_slug_is_first_entrypoint() {
    let m = manifest(&["app", "admin"], &[]);
    assert_eq!(m.default_app_slug(), Some("app"));
}

#[test]
fn default_app_slug_is_none_when_entrypoints_empty() {
    let m = manifest(&[], &[]);
    assert_eq!(m.default_app_slug(), None);
}

#[test]
fn default_ws_url_transforms_first_network_uri() {
    let m = manifest(&["app"], &["http://sync.example.com"]);
    assert_eq!(m.default_ws_url().as_deref(), Some("ws://sync.example.com"));
}
