// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`VfsCore`] implementation for tests and the diagnostic CLI.
//!
//! A `test-support` feature-gated, hand-rollable stand-in for the real
//! backend that lets the rest of the workspace exercise its logic without
//! a network or a CRDT engine.

use crate::contract::{
    BundleParser, DirectoryChange, DocumentChange, FileMetadata, ReadFileResult, StorageBackend,
    VfsCore, VfsFactory, VfsStorageConfig, WatcherHandle,
};
use async_trait::async_trait;
use brr_core::{BrrError, BrrResult, Manifest};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A file as the fake VFS stores it: either structured JSON or raw bytes.
#[derive(Debug, Clone)]
enum Entry {
    Json(Value),
    Bytes(Vec<u8>, Option<String>),
    Directory,
}

struct Inner {
    files: Mutex<HashMap<String, Entry>>,
    connected: AtomicBool,
    reject_connect: AtomicBool,
    document_watchers: Mutex<HashMap<String, Vec<mpsc::Sender<DocumentChange>>>>,
    directory_watchers: Mutex<HashMap<String, Vec<mpsc::Sender<DirectoryChange>>>>,
}

/// In-memory VFS Core stand-in.
///
/// `namespace` records the storage namespace it was constructed with so
/// tests can assert the loader threaded the `launcherBundleId` through
/// correctly.
#[derive(Clone)]
pub struct FakeVfs {
    namespace: Arc<str>,
    inner: Arc<Inner>,
}

impl FakeVfs {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().into(),
            inner: Arc::new(Inner {
                files: Mutex::new(HashMap::new()),
                connected: AtomicBool::new(true),
                reject_connect: AtomicBool::new(false),
                document_watchers: Mutex::new(HashMap::new()),
                directory_watchers: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Seed a JSON file before handing the instance to code under test.
    pub fn set_json(&self, path: impl Into<String>, content: Value) {
        self.inner.files.lock().insert(path.into(), Entry::Json(content));
    }

    /// Seed a binary file before handing the instance to code under test.
    pub fn set_bytes(&self, path: impl Into<String>, bytes: Vec<u8>, mime: Option<&str>) {
        self.inner.files.lock().insert(path.into(), Entry::Bytes(bytes, mime.map(str::to_string)));
    }

    /// Directly force the connection-health flag, for reconnect tests.
    pub fn set_connected(&self, connected: bool) {
        self.inner.connected.store(connected, Ordering::SeqCst);
    }

    /// Make the next `connect_websocket` calls fail until toggled off, for
    /// reconnect-backoff tests.
    pub fn set_reject_connect(&self, reject: bool) {
        self.inner.reject_connect.store(reject, Ordering::SeqCst);
    }

    /// Push a change event to every watcher currently registered on `path`.
    pub async fn emit_document_change(&self, path: &str, document_data: Value) {
        let senders: Vec<_> = {
            let map = self.inner.document_watchers.lock();
            map.get(path).cloned().unwrap_or_default()
        };
        for tx in senders {
            let _ = tx.send(DocumentChange { document_data: document_data.clone() }).await;
        }
    }

    pub async fn emit_directory_change(&self, path: &str, change_data: Value) {
        let senders: Vec<_> = {
            let map = self.inner.directory_watchers.lock();
            map.get(path).cloned().unwrap_or_default()
        };
        for tx in senders {
            let _ =
                tx.send(DirectoryChange { path: path.to_string(), change_data: change_data.clone() }).await;
        }
    }

    fn with_entry<R>(&self, path: &str, f: impl FnOnce(&Entry) -> BrrResult<R>) -> BrrResult<R> {
        let files = self.inner.files.lock();
        match files.get(path) {
            Some(entry) => f(entry),
            None => Err(BrrError::vfs(format!("{path} not found"))),
        }
    }

    /// Serializes every stored entry, for `toBytes`/`forkToBytes`. Only
    /// JSON entries round-trip meaningfully; binary entries are summarized
    /// by length since the fake has no real CRDT-backed byte codec.
    fn snapshot(&self) -> serde_json::Value {
        let files = self.inner.files.lock();
        let mut map = serde_json::Map::new();
        for (path, entry) in files.iter() {
            let v = match entry {
                Entry::Json(v) => v.clone(),
                Entry::Bytes(b, _) => Value::String(format!("<{} bytes>", b.len())),
                Entry::Directory => Value::String("<dir>".to_string()),
            };
            map.insert(path.clone(), v);
        }
        Value::Object(map)
    }
}

/// A standalone, inert [`WatcherHandle`] for seeding fixtures that don't go
/// through `watch_document`/`watch_directory`.
#[derive(Default)]
pub struct FakeWatcherHandle {
    stopped: Arc<AtomicBool>,
}

impl FakeWatcherHandle {
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl WatcherHandle for FakeWatcherHandle {
    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VfsCore for FakeVfs {
    async fn connect_websocket(&self, url: &str) -> BrrResult<()> {
        if self.inner.reject_connect.load(Ordering::SeqCst) {
            return Err(BrrError::TransientNetwork(format!("refused to connect to {url}")));
        }
        self.inner.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    async fn get_connection_state(&self) -> String {
        if self.is_connected().await { "connected".to_string() } else { "disconnected".to_string() }
    }

    async fn read_file(&self, path: &str) -> BrrResult<ReadFileResult> {
        self.with_entry(path, |entry| match entry {
            Entry::Json(v) => Ok(ReadFileResult { content: v.clone(), bytes: None, mime: None }),
            Entry::Bytes(b, mime) => Ok(ReadFileResult {
                content: Value::Null,
                bytes: Some(base64_encode(b)),
                mime: mime.clone(),
            }),
            Entry::Directory => Err(BrrError::vfs(format!("{path} is a directory"))),
        })
    }

    async fn set_file(&self, path: &str, content: Value) -> BrrResult<()> {
        self.inner.files.lock().insert(path.to_string(), Entry::Json(content));
        Ok(())
    }

    async fn create_file(&self, path: &str, content: Value) -> BrrResult<()> {
        self.set_file(path, content).await
    }

    async fn set_file_with_bytes(&self, path: &str, bytes: &[u8], mime: Option<&str>) -> BrrResult<()> {
        self.inner.files.lock().insert(path.to_string(), Entry::Bytes(bytes.to_vec(), mime.map(str::to_string)));
        Ok(())
    }

    async fn create_file_with_bytes(&self, path: &str, bytes: &[u8], mime: Option<&str>) -> BrrResult<()> {
        self.set_file_with_bytes(path, bytes, mime).await
    }

    async fn update_file(&self, path: &str, content: Value) -> BrrResult<()> {
        self.set_file(path, content).await
    }

    async fn patch_file(&self, path: &str, json_path: &str, value: Value) -> BrrResult<()> {
        let mut files = self.inner.files.lock();
        match files.get_mut(path) {
            Some(Entry::Json(existing)) => {
                patch_json_path(existing, json_path, value);
                Ok(())
            }
            Some(_) => Err(BrrError::vfs(format!("{path} is not a JSON document"))),
            None => Err(BrrError::vfs(format!("{path} not found"))),
        }
    }

    async fn splice_text(
        &self,
        path: &str,
        _start: usize,
        _delete_count: usize,
        insert: &str,
    ) -> BrrResult<()> {
        let mut files = self.inner.files.lock();
        match files.get_mut(path) {
            Some(Entry::Json(Value::String(s))) => {
                s.push_str(insert);
                Ok(())
            }
            _ => Err(BrrError::vfs(format!("{path} is not a text document"))),
        }
    }

    async fn delete_file(&self, path: &str) -> BrrResult<()> {
        self.inner
            .files
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| BrrError::vfs(format!("{path} not found")))
    }

    async fn create_directory(&self, path: &str) -> BrrResult<()> {
        self.inner.files.lock().insert(path.to_string(), Entry::Directory);
        Ok(())
    }

    async fn list_directory(&self, path: &str) -> BrrResult<Vec<String>> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let files = self.inner.files.lock();
        Ok(files
            .keys()
            .filter(|k| k.starts_with(&prefix) && !k[prefix.len()..].contains('/'))
            .cloned()
            .collect())
    }

    async fn exists(&self, path: &str) -> BrrResult<bool> {
        Ok(self.inner.files.lock().contains_key(path))
    }

    async fn rename(&self, from: &str, to: &str) -> BrrResult<()> {
        let mut files = self.inner.files.lock();
        let entry = files.remove(from).ok_or_else(|| BrrError::vfs(format!("{from} not found")))?;
        files.insert(to.to_string(), entry);
        Ok(())
    }

    async fn get_metadata(&self, path: &str) -> BrrResult<FileMetadata> {
        self.with_entry(path, |entry| match entry {
            Entry::Json(v) => Ok(FileMetadata {
                size: v.to_string().len() as u64,
                mime: Some("application/json".to_string()),
                is_directory: false,
            }),
            Entry::Bytes(b, mime) => {
                Ok(FileMetadata { size: b.len() as u64, mime: mime.clone(), is_directory: false })
            }
            Entry::Directory => Ok(FileMetadata { size: 0, mime: None, is_directory: true }),
        })
    }

    async fn watch_document(
        &self,
        path: &str,
    ) -> BrrResult<(Box<dyn WatcherHandle>, mpsc::Receiver<DocumentChange>)> {
        let (tx, rx) = mpsc::channel(16);
        self.inner.document_watchers.lock().entry(path.to_string()).or_default().push(tx);
        Ok((Box::new(FakeWatcherHandle { stopped: Arc::new(AtomicBool::new(false)) }), rx))
    }

    async fn watch_directory(
        &self,
        path: &str,
    ) -> BrrResult<(Box<dyn WatcherHandle>, mpsc::Receiver<DirectoryChange>)> {
        let (tx, rx) = mpsc::channel(16);
        self.inner.directory_watchers.lock().entry(path.to_string()).or_default().push(tx);
        Ok((Box::new(FakeWatcherHandle { stopped: Arc::new(AtomicBool::new(false)) }), rx))
    }

    async fn to_bytes(&self) -> BrrResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.snapshot()).unwrap_or_default())
    }

    async fn fork_to_bytes(&self) -> BrrResult<Vec<u8>> {
        self.to_bytes().await
    }
}

fn patch_json_path(target: &mut Value, json_path: &str, value: Value) {
    let mut cursor = target;
    let segments: Vec<&str> = json_path.split('.').filter(|s| !s.is_empty()).collect();
    for (i, seg) in segments.iter().enumerate() {
        if i == segments.len() - 1 {
            if let Value::Object(map) = cursor {
                map.insert(seg.to_string(), value);
            }
            return;
        }
        cursor = cursor
            .as_object_mut()
            .map(|map| map.entry(seg.to_string()).or_insert_with(|| Value::Object(Default::default())))
            .map(|v| v as &mut Value)
            .unwrap_or(cursor);
    }
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// `Bundle::fromBytes(..).getManifest()` stand-in: treats the bundle bytes
/// as a JSON-encoded [`Manifest`] directly, since the fake has no real
/// bundle codec.
pub struct FakeBundleParser;

#[async_trait]
impl BundleParser for FakeBundleParser {
    async fn parse(&self, bytes: &[u8]) -> BrrResult<Manifest> {
        serde_json::from_slice(bytes).map_err(|e| BrrError::bundle(format!("manifest parse error: {e}")))
    }
}

/// Builds [`FakeVfs`] instances. The bytes payload is ignored; callers seed
/// files on the concrete `FakeVfs` (via `set_json`/`set_bytes`) by holding
/// onto it directly rather than through the `Arc<dyn VfsCore>` this returns.
pub struct FakeVfsFactory;

#[async_trait]
impl VfsFactory for FakeVfsFactory {
    async fn from_bytes(&self, _bytes: &[u8], storage: VfsStorageConfig) -> BrrResult<Arc<dyn VfsCore>> {
        debug_assert!(matches!(storage.backend, StorageBackend::IndexedDb));
        Ok(Arc::new(FakeVfs::new(storage.namespace)))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
