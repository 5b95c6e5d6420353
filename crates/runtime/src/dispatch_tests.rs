// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::registry::ActiveBundle;
use crate::state::BundleState;
use brr_cache::MemoryCacheStore;
use brr_core::Manifest;
use brr_vfs::fake::{FakeBundleParser, FakeVfs, FakeVfsFactory};
use serde_json::json;

fn test_ctx() -> Arc<RuntimeCtx> {
    Arc::new(RuntimeCtx::new(
        Arc::new(FakeVfsFactory),
        Arc::new(FakeBundleParser),
        Arc::new(MemoryCacheStore::new()),
        "http://localhost:3000",
    ))
}

fn activate(ctx: &RuntimeCtx, id: &LauncherBundleId, vfs: FakeVfs) {
    let active = ActiveBundle::new(
        "root-1".to_string(),
        Arc::new(vfs),
        Manifest { root_id: "root-1".into(), entrypoints: vec!["app".into()], network_uris: vec![] },
        "app".into(),
        "ws://sync.example/bundle".into(),
    );
    ctx.registry.set_active(id.clone(), BundleState::Active(Box::new(active)));
}

fn request(op: Operation, launcher_bundle_id: Option<&str>) -> Request {
    Request { id: Some("req-1".to_string()), launcher_bundle_id: launcher_bundle_id.map(LauncherBundleId::from), op }
}

#[tokio::test]
async fn ping_replies_and_broadcasts_ready() {
    let ctx = test_ctx();
    let (tx, mut rx) = tokio::sync::mpsc::channel(4);
    ctx.clients.register("observer".into(), tx);

    let reply = dispatch(&ctx, &"observer".into(), request(Operation::Ping, None)).await;

    assert!(reply.success);
    assert_eq!(reply.data.unwrap()["needsBundle"], true);
    let broadcast = rx.recv().await.unwrap();
    assert_eq!(broadcast.kind, "ready");
}

#[tokio::test]
async fn load_bundle_without_a_launcher_bundle_id_is_rejected() {
    let ctx = test_ctx();
    let reply = dispatch(&ctx, &"c1".into(), request(Operation::LoadBundle { bundle_bytes: None, ws_url: None }, None))
        .await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("launcherBundleId is required"));
}

#[tokio::test]
async fn read_file_with_no_bundle_context_is_rejected() {
    let ctx = test_ctx();
    let reply = dispatch(&ctx, &"c1".into(), request(Operation::ReadFile { path: "/a".into() }, None)).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("No bundle context"));
}

#[tokio::test]
async fn read_file_against_an_unloaded_bundle_id_reports_not_initialized() {
    let ctx = test_ctx();
    let reply =
        dispatch(&ctx, &"c1".into(), request(Operation::ReadFile { path: "/a".into() }, Some("missing"))).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("Bundle not initialized"));
}

#[tokio::test]
async fn read_file_against_an_active_bundle_returns_its_content() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    let vfs = FakeVfs::new("bundle-1");
    vfs.set_json("app/index.html", json!("<h1>hi</h1>"));
    activate(&ctx, &id, vfs);

    let reply =
        dispatch(&ctx, &"c1".into(), request(Operation::ReadFile { path: "app/index.html".into() }, Some("bundle-1")))
            .await;

    assert!(reply.success);
    assert_eq!(reply.data.unwrap()["content"], json!("<h1>hi</h1>"));
}

#[tokio::test]
async fn write_file_then_read_file_round_trips() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    activate(&ctx, &id, FakeVfs::new("bundle-1"));

    let write = dispatch(
        &ctx,
        &"c1".into(),
        request(Operation::WriteFile { path: "app/note.txt".into(), content: json!("hello"), create: true }, Some("bundle-1")),
    )
    .await;
    assert!(write.success);

    let read =
        dispatch(&ctx, &"c1".into(), request(Operation::ReadFile { path: "app/note.txt".into() }, Some("bundle-1")))
            .await;
    assert_eq!(read.data.unwrap()["content"], json!("hello"));
}

#[tokio::test]
async fn get_server_url_is_exempt_from_the_precondition_gate() {
    let ctx = test_ctx();
    let reply = dispatch(&ctx, &"c1".into(), request(Operation::GetServerUrl, None)).await;

    assert!(reply.success);
    assert_eq!(reply.data.unwrap()["serverUrl"], "http://localhost:3000");
}

#[tokio::test]
async fn initialize_from_url_is_explicitly_unsupported() {
    let ctx = test_ctx();
    let reply = dispatch(
        &ctx,
        &"c1".into(),
        request(Operation::InitializeFromUrl { url: "https://example.com/bundle".into() }, Some("bundle-1")),
    )
    .await;

    assert!(!reply.success);
    assert!(reply.error.unwrap().contains("not supported"));
}

#[tokio::test]
async fn watch_file_then_unwatch_file_round_trips() {
    let ctx = test_ctx();
    let id = LauncherBundleId::from("bundle-1");
    activate(&ctx, &id, FakeVfs::new("bundle-1"));

    let watch = dispatch(
        &ctx,
        &"c1".into(),
        request(Operation::WatchFile { watch_id: "w1".into(), path: "app/index.html".into() }, Some("bundle-1")),
    )
    .await;
    assert!(watch.success);
    assert_eq!(ctx.registry.list_watcher_ids(&id).len(), 1);

    let unwatch = dispatch(
        &ctx,
        &"c1".into(),
        request(Operation::UnwatchFile { watch_id: "w1".into() }, Some("bundle-1")),
    )
    .await;
    assert!(unwatch.success);
    assert!(ctx.registry.list_watcher_ids(&id).is_empty());
}

#[tokio::test]
async fn set_app_slug_with_no_bundle_context_is_rejected() {
    let ctx = test_ctx();
    let reply = dispatch(&ctx, &"c1".into(), request(Operation::SetAppSlug { slug: "app2".into() }, None)).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("No bundle context"));
}
