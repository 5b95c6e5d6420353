// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level scenario and invariant tests exercising the router,
//! loader, dispatcher, and health controller together against fakes.

use brr_cache::MemoryCacheStore;
use brr_core::{ClientId, LauncherBundleId, Manifest};
use brr_router::{classify, ClassifyInput};
use brr_runtime::{dispatch, load_bundle, ActiveBundle, BundleState, FetchAction, HealthController, RuntimeCtx};
use brr_vfs::fake::{FakeBundleParser, FakeVfs, FakeVfsFactory};
use brr_wire::{Operation, Request};
use serde_json::json;
use std::sync::Arc;

fn test_ctx() -> Arc<RuntimeCtx> {
    Arc::new(RuntimeCtx::new(
        Arc::new(FakeVfsFactory),
        Arc::new(FakeBundleParser),
        Arc::new(MemoryCacheStore::new()),
        "http://localhost:3000",
    ))
}

fn manifest_bytes(entrypoints: &[&str], network_uris: &[&str]) -> Vec<u8> {
    let manifest = Manifest {
        root_id: "root-abc".to_string(),
        entrypoints: entrypoints.iter().map(|s| s.to_string()).collect(),
        network_uris: network_uris.iter().map(|s| s.to_string()).collect(),
    };
    serde_json::to_vec(&manifest).unwrap()
}

fn activate(ctx: &RuntimeCtx, id: &LauncherBundleId, vfs: FakeVfs) {
    let active = ActiveBundle::new(
        "root-1".to_string(),
        Arc::new(vfs),
        Manifest { root_id: "root-1".into(), entrypoints: vec!["app".into()], network_uris: vec!["ws://sync.example".into()] },
        "app".into(),
        "ws://sync.example/bundle".into(),
    );
    ctx.registry.set_active(id.clone(), BundleState::Active(Box::new(active)));
    ctx.registry.set_last_active_bundle_id(id.clone());
}

// ---------------------------------------------------------------------
// Scenario 1: cold start, empty cache, ping -> ready { needsBundle: true }
// ---------------------------------------------------------------------

#[tokio::test]
async fn cold_start_ping_reports_needs_bundle() {
    let ctx = test_ctx();
    let client = ClientId::from("client-1");

    let request = Request { id: Some("1".to_string()), launcher_bundle_id: None, op: Operation::Ping };
    let reply = dispatch(&ctx, &client, request).await;

    assert!(reply.success);
    assert_eq!(reply.data.unwrap()["needsBundle"], json!(true));
}

// ---------------------------------------------------------------------
// Scenario 2: load + read, a served path returns the seeded content
// ---------------------------------------------------------------------

#[tokio::test]
async fn load_then_read_returns_the_seeded_file() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    let vfs = FakeVfs::new("bundle-1");
    vfs.set_json("app/index.html", json!("<h1>hi</h1>"));
    activate(&ctx, &id, vfs);

    let action = brr_runtime::intercept(&ctx, "/space/bundle-1/app/", "", false).await;
    match action {
        FetchAction::Serve(response) => {
            assert_eq!(response.status, 200);
            assert_eq!(response.body, serde_json::to_vec(&json!("<h1>hi</h1>")).unwrap());
        }
        other => panic!("expected Serve, got {other:?}"),
    }
}

// ---------------------------------------------------------------------
// Scenario 3: SPA fallback, a missing deep route falls back to index.html
// ---------------------------------------------------------------------

#[tokio::test]
async fn missing_deep_route_falls_back_to_index_html() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    let vfs = FakeVfs::new("bundle-1");
    vfs.set_json("app/index.html", json!("<h1>spa shell</h1>"));
    activate(&ctx, &id, vfs);

    let action = brr_runtime::intercept(&ctx, "/space/bundle-1/app/settings/profile", "", false).await;
    match action {
        FetchAction::Serve(response) => {
            assert_eq!(response.status, 200);
            assert_eq!(response.body, serde_json::to_vec(&json!("<h1>spa shell</h1>")).unwrap());
        }
        other => panic!("expected Serve, got {other:?}"),
    }
}

// ---------------------------------------------------------------------
// Scenario 4: double load is idempotent
// ---------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn loading_the_same_bundle_twice_is_idempotent() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    let bytes = manifest_bytes(&["app"], &["ws://sync.example"]);

    let first = load_bundle(&ctx, id.clone(), Some(bytes.clone()), None, None).await;
    assert!(first.success);
    assert!(!first.skipped);

    let watch_count_before = ctx.registry.list_watcher_ids(&id).len();

    let second = load_bundle(&ctx, id.clone(), Some(bytes), None, None).await;
    assert!(second.success);
    assert!(second.skipped);

    assert_eq!(ctx.registry.list_watcher_ids(&id).len(), watch_count_before);
}

// ---------------------------------------------------------------------
// Scenario 5: concurrent load requests for the same bundle coalesce
// ---------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn concurrent_loads_of_the_same_bundle_coalesce() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    let bytes = manifest_bytes(&["app"], &["ws://sync.example"]);

    let (a, b) = tokio::join!(
        load_bundle(&ctx, id.clone(), Some(bytes.clone()), None, None),
        load_bundle(&ctx, id.clone(), Some(bytes), None, None),
    );

    assert!(a.success && b.success);
    assert!(ctx.registry.is_active(&id));
    // Only one of the two callers actually ran the pipeline; the other saw
    // it was already active and was skipped.
    assert!(a.skipped || b.skipped);
    assert!(!(a.skipped && b.skipped));
}

// ---------------------------------------------------------------------
// Scenario 6: reconnect broadcasts disconnected, then reconnected with
// reconnectAttempts reset to 0
// ---------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn reconnect_broadcasts_disconnected_then_reconnected_with_attempts_reset() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    let vfs = FakeVfs::new("bundle-1");
    activate(&ctx, &id, vfs.clone());

    let (tx, mut rx) = tokio::sync::mpsc::channel(32);
    ctx.clients.register(ClientId::from("watcher"), tx);

    let task = HealthController::spawn(Arc::clone(&ctx), id.clone());
    ctx.registry.set_health_task(&id, task);

    vfs.set_connected(false);

    let disconnected = rx.recv().await.unwrap();
    assert_eq!(disconnected.kind, "disconnected");

    let reconnecting = rx.recv().await.unwrap();
    assert_eq!(reconnecting.kind, "reconnecting");
    assert_eq!(reconnecting.data.unwrap()["attempt"], json!(1));

    // The fake's `connect_websocket` always marks itself connected again on
    // success, so the very next attempt recovers.
    let reconnected = rx.recv().await.unwrap();
    assert_eq!(reconnected.kind, "reconnected");

    assert!(ctx
        .registry
        .with_state(&id, |s| match s {
            BundleState::Active(active) => active.reconnect_attempts == 0 && active.connection_healthy,
            _ => false,
        })
        .unwrap());
}

// ---------------------------------------------------------------------
// Invariant: at most one Active state per launcherBundleId at a time
// ---------------------------------------------------------------------

#[tokio::test]
async fn setting_active_twice_shuts_down_the_previous_bundle() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    activate(&ctx, &id, FakeVfs::new("bundle-1"));
    let first_healthy = ctx.registry.with_state(&id, |s| matches!(s, BundleState::Active(_))).unwrap();
    assert!(first_healthy);

    activate(&ctx, &id, FakeVfs::new("bundle-1"));
    let active_count =
        ctx.registry.with_state(&id, |s| matches!(s, BundleState::Active(_))).unwrap();
    assert!(active_count);
}

// ---------------------------------------------------------------------
// Invariant: removing a bundle stops every watcher it owned
// ---------------------------------------------------------------------

#[tokio::test]
async fn removing_a_bundle_stops_every_watcher() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    let vfs = FakeVfs::new("bundle-1");
    activate(&ctx, &id, vfs);

    brr_runtime::dispatch(
        &ctx,
        &ClientId::from("client-1"),
        Request {
            id: Some("1".to_string()),
            launcher_bundle_id: Some(id.clone()),
            op: Operation::WatchFile { watch_id: "w1".into(), path: "app/index.html".to_string() },
        },
    )
    .await;

    assert_eq!(ctx.registry.list_watcher_ids(&id).len(), 1);

    ctx.registry.remove(&id);

    assert_eq!(ctx.registry.list_watcher_ids(&id).len(), 0);
}

// ---------------------------------------------------------------------
// Invariant: reconnect backoff stays within [1000, 30000]ms
// ---------------------------------------------------------------------

#[test]
fn reconnect_backoff_formula_stays_within_bounds() {
    for attempt in 1..=10u32 {
        let backoff_ms = (1000u64.saturating_mul(1u64 << (attempt.saturating_sub(1)))).min(30_000);
        assert!((1000..=30_000).contains(&backoff_ms), "attempt {attempt} produced {backoff_ms}ms");
    }
}

#[test]
fn reconnect_backoff_is_monotonically_non_decreasing_within_a_streak() {
    let mut previous = 0;
    for attempt in 1..=10u32 {
        let backoff_ms = (1000u64.saturating_mul(1u64 << (attempt.saturating_sub(1)))).min(30_000);
        assert!(backoff_ms >= previous);
        previous = backoff_ms;
    }
}

// ---------------------------------------------------------------------
// Invariant: route classification is a total, deterministic pure function
// ---------------------------------------------------------------------

#[test]
fn classification_is_deterministic_for_the_same_input() {
    let input = ClassifyInput { path: "/space/bundle-1/app/index.html", query: "", is_websocket_upgrade: false, serve_local: false };
    let first = classify(&input, "http://localhost:4001");
    let second = classify(&input, "http://localhost:4001");
    assert_eq!(first, second);
}

#[test]
fn every_path_shape_classifies_to_some_route() {
    let paths = ["/", "/favicon.ico", "/src/main.tsx", "/space/bundle-1/app/thing", "/other/file.txt"];
    for path in paths {
        let input = ClassifyInput { path, query: "", is_websocket_upgrade: false, serve_local: false };
        // classify is total: this simply must not panic for any of these shapes.
        let _ = classify(&input, "http://localhost:4001");
    }
}

// ---------------------------------------------------------------------
// Invariant: cache-backed auto-init recovery reaches the same Active state
// a fresh load would
// ---------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn cache_recovery_reaches_the_same_active_state_as_a_fresh_load() {
    let bytes = manifest_bytes(&["app"], &["ws://sync.example"]);

    let fresh_ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");

    let fresh = load_bundle(&fresh_ctx, id.clone(), Some(bytes.clone()), None, None).await;
    assert!(fresh.success);
    let fresh_slug = fresh_ctx
        .registry
        .with_state(&id, |s| match s {
            BundleState::Active(active) => Some(active.app_slug.clone()),
            _ => None,
        })
        .flatten();

    // A second process, cold: nothing loaded yet, but the cache carries
    // what the first process's loader persisted.
    let recovered_ctx = test_ctx();
    recovered_ctx.cache.clear_all(brr_core::RESERVED_RUNTIME_BUNDLE_ID).await.ok();
    for key in [
        brr_core::CacheKey::APP_SLUG,
        brr_core::CacheKey::BUNDLE_BYTES,
        brr_core::CacheKey::WS_URL,
        brr_core::CacheKey::NAMESPACE,
    ] {
        if let Ok(Some(blob)) = fresh_ctx.cache.get("bundle-1", key).await {
            recovered_ctx.cache.put("bundle-1", key, blob).await.unwrap();
        }
    }
    if let Ok(Some(blob)) = fresh_ctx.cache.get(brr_core::RESERVED_RUNTIME_BUNDLE_ID, brr_core::CacheKey::LAST_ACTIVE_BUNDLE_ID).await {
        recovered_ctx.cache.put(brr_core::RESERVED_RUNTIME_BUNDLE_ID, brr_core::CacheKey::LAST_ACTIVE_BUNDLE_ID, blob).await.unwrap();
    }

    brr_runtime::run_auto_init(Arc::clone(&recovered_ctx)).await;

    assert!(recovered_ctx.registry.is_active(&id));
    let recovered_slug = recovered_ctx
        .registry
        .with_state(&id, |s| match s {
            BundleState::Active(active) => Some(active.app_slug.clone()),
            _ => None,
        })
        .flatten();
    assert_eq!(fresh_slug, recovered_slug);
}
