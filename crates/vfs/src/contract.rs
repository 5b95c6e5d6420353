// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The VFS Core contract expressed as async traits.
//!
//! The CRDT engine itself — bundle parsing, document storage, text
//! splicing, websocket sync — is explicitly out of scope; this module only
//! pins down the shape the rest of the router is allowed to assume, via
//! the same trait-object black-box-backend boundary an adapter crate
//! would draw around an external process.

use async_trait::async_trait;
use brr_core::{BrrResult, Manifest};
use serde_json::Value;
use std::sync::Arc;

/// Storage backend for a VFS instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    IndexedDb,
}

/// `{ storage: { backend, namespace } }` passed to `Vfs::fromBytes`.
#[derive(Debug, Clone)]
pub struct VfsStorageConfig {
    pub backend: StorageBackend,
    pub namespace: String,
}

/// Result of a `readFile` call.
#[derive(Debug, Clone)]
pub struct ReadFileResult {
    pub content: Value,
    /// Base64-encoded octets, when the file is binary.
    pub bytes: Option<String>,
    pub mime: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub mime: Option<String>,
    pub is_directory: bool,
}

/// A single `fileChanged` payload delivered from a document watcher.
#[derive(Debug, Clone)]
pub struct DocumentChange {
    pub document_data: Value,
}

/// A single `directoryChanged` payload delivered from a directory watcher.
#[derive(Debug, Clone)]
pub struct DirectoryChange {
    pub path: String,
    pub change_data: Value,
}

/// Parses raw bundle bytes into a [`Manifest`], collapsing
/// `fromBytes(bytes).getManifest()` plus the matching `.free()` into one
/// call.
///
/// The temporary bundle handle some implementations keep around just to
/// call `.free()` on has no Rust equivalent worth modeling — ownership of
/// the parsed bundle ends when `parse` returns, which is the scoped-resource
/// idiom this design favors generally.
#[async_trait]
pub trait BundleParser: Send + Sync {
    async fn parse(&self, bytes: &[u8]) -> BrrResult<Manifest>;
}

/// Builds a [`VfsCore`] instance from serialized bundle bytes via
/// `Vfs::fromBytes`.
#[async_trait]
pub trait VfsFactory: Send + Sync {
    async fn from_bytes(&self, bytes: &[u8], storage: VfsStorageConfig) -> BrrResult<Arc<dyn VfsCore>>;
}

/// A live, instantiated virtual filesystem.
#[async_trait]
pub trait VfsCore: Send + Sync {
    async fn connect_websocket(&self, url: &str) -> BrrResult<()>;
    async fn is_connected(&self) -> bool;
    async fn get_connection_state(&self) -> String;

    async fn read_file(&self, path: &str) -> BrrResult<ReadFileResult>;
    async fn set_file(&self, path: &str, content: Value) -> BrrResult<()>;
    async fn create_file(&self, path: &str, content: Value) -> BrrResult<()>;
    async fn set_file_with_bytes(&self, path: &str, bytes: &[u8], mime: Option<&str>) -> BrrResult<()>;
    async fn create_file_with_bytes(&self, path: &str, bytes: &[u8], mime: Option<&str>) -> BrrResult<()>;
    async fn update_file(&self, path: &str, content: Value) -> BrrResult<()>;
    async fn patch_file(&self, path: &str, json_path: &str, value: Value) -> BrrResult<()>;
    async fn splice_text(&self, path: &str, start: usize, delete_count: usize, insert: &str) -> BrrResult<()>;
    async fn delete_file(&self, path: &str) -> BrrResult<()>;
    async fn create_directory(&self, path: &str) -> BrrResult<()>;
    async fn list_directory(&self, path: &str) -> BrrResult<Vec<String>>;
    async fn exists(&self, path: &str) -> BrrResult<bool>;
    async fn rename(&self, from: &str, to: &str) -> BrrResult<()>;
    async fn get_metadata(&self, path: &str) -> BrrResult<FileMetadata>;

    /// Subscribes to a single document. Returns a handle the caller must
    /// hold to keep the subscription alive, and a receiver of change events.
    async fn watch_document(
        &self,
        path: &str,
    ) -> BrrResult<(Box<dyn WatcherHandle>, tokio::sync::mpsc::Receiver<DocumentChange>)>;

    /// Subscribes to a directory. Returns a handle and a receiver of change
    /// events.
    async fn watch_directory(
        &self,
        path: &str,
    ) -> BrrResult<(Box<dyn WatcherHandle>, tokio::sync::mpsc::Receiver<DirectoryChange>)>;

    async fn to_bytes(&self) -> BrrResult<Vec<u8>>;
    async fn fork_to_bytes(&self) -> BrrResult<Vec<u8>>;
}

/// Owns a watch subscription; dropping the handle does not itself stop the
/// subscription (the registry decides when to stop it), but calling
/// [`stop`](WatcherHandle::stop) unconditionally tears it down.
pub trait WatcherHandle: Send + Sync {
    fn stop(&self);
}
