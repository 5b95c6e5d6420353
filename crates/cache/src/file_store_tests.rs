use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn put_then_get_roundtrips_bytes() {
    let dir = tempdir().unwrap();
    let store = FileCacheStore::new(dir.path());
    store.put("bundle-a", "appSlug", b"hello".to_vec()).await.unwrap();

    let got = store.get("bundle-a", "appSlug").await.unwrap();
    assert_eq!(got, Some(b"hello".to_vec()));
}

#[tokio::test]
async fn get_missing_key_returns_none() {
    let dir = tempdir().unwrap();
    let store = FileCacheStore::new(dir.path());
    assert_eq!(store.get("bundle-a", "appSlug").await.unwrap(), None);
}

#[tokio::test]
async fn put_overwrites_the_previous_value() {
    let dir = tempdir().unwrap();
    let store = FileCacheStore::new(dir.path());
    store.put("bundle-a", "wsUrl", b"ws://one".to_vec()).await.unwrap();
    store.put("bundle-a", "wsUrl", b"ws://two".to_vec()).await.unwrap();

    assert_eq!(store.get("bundle-a", "wsUrl").await.unwrap(), Some(b"ws://two".to_vec()));
}

#[tokio::test]
async fn delete_is_not_an_error_when_absent() {
    let dir = tempdir().unwrap();
    let store = FileCacheStore::new(dir.path());
    store.delete("bundle-a", "namespace").await.unwrap();
}

#[tokio::test]
async fn clear_all_removes_every_key_in_the_namespace() {
    let dir = tempdir().unwrap();
    let store = FileCacheStore::new(dir.path());
    store.put("bundle-a", "appSlug", b"x".to_vec()).await.unwrap();
    store.put("bundle-a", "bundleBytes", b"y".to_vec()).await.unwrap();

    store.clear_all("bundle-a").await.unwrap();

    assert_eq!(store.get("bundle-a", "appSlug").await.unwrap(), None);
    assert_eq!(store.get("bundle-a", "bundleBytes").await.unwrap(), None);
}

#[tokio::test]
async fn namespaces_do_not_leak_into_each_other() {
    let dir = tempdir().unwrap();
    let store = FileCacheStore::new(dir.path());
    store.put("bundle-a", "appSlug", b"a".to_vec()).await.unwrap();
    store.put("bundle-b", "appSlug", b"b".to_vec()).await.unwrap();

    store.clear_all("bundle-a").await.unwrap();

    assert_eq!(store.get("bundle-a", "appSlug").await.unwrap(), None);
    assert_eq!(store.get("bundle-b", "appSlug").await.unwrap(), Some(b"b".to_vec()));
}
