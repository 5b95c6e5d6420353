// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A zstd-compressed, file-backed [`CacheStore`].
//!
//! Each `namespace`/`key` pair maps to `<base_dir>/<namespace>/<key>.zst`.
//! Writes go through a `.tmp` sibling and an atomic rename so a crash mid
//! write never leaves a half-written blob behind (the write side of the
//! same durability idiom the breadcrumb writer uses).

use crate::contract::CacheStore;
use async_trait::async_trait;
use brr_core::{BrrError, BrrResult};
use std::path::{Path, PathBuf};

const ZSTD_LEVEL: i32 = 3;

pub struct FileCacheStore {
    base_dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.base_dir.join(namespace)
    }

    fn blob_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.namespace_dir(namespace).join(format!("{key}.zst"))
    }

    async fn read_compressed(path: &Path) -> BrrResult<Option<Vec<u8>>> {
        let compressed = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BrrError::cache_io(format!("read {}: {e}", path.display()))),
        };
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            zstd::decode_all(compressed.as_slice())
                .map(Some)
                .map_err(|e| BrrError::cache_io(format!("decompress {}: {e}", path.display())))
        })
        .await
        .map_err(|e| BrrError::cache_io(format!("decompress task panicked: {e}")))?
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, namespace: &str, key: &str) -> BrrResult<Option<Vec<u8>>> {
        Self::read_compressed(&self.blob_path(namespace, key)).await
    }

    async fn put(&self, namespace: &str, key: &str, value: Vec<u8>) -> BrrResult<()> {
        let dir = self.namespace_dir(namespace);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| BrrError::cache_io(format!("create_dir {}: {e}", dir.display())))?;

        let compressed = tokio::task::spawn_blocking(move || zstd::encode_all(value.as_slice(), ZSTD_LEVEL))
            .await
            .map_err(|e| BrrError::cache_io(format!("compress task panicked: {e}")))?
            .map_err(|e| BrrError::cache_io(format!("compress: {e}")))?;

        let path = self.blob_path(namespace, key);
        let tmp_path = path.with_extension("zst.tmp");
        tokio::fs::write(&tmp_path, &compressed)
            .await
            .map_err(|e| BrrError::cache_io(format!("write {}: {e}", tmp_path.display())))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| BrrError::cache_io(format!("rename {}: {e}", path.display())))?;

        tracing::debug!(namespace, key, bytes = compressed.len(), "wrote cache blob");
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> BrrResult<()> {
        let path = self.blob_path(namespace, key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BrrError::cache_io(format!("delete {}: {e}", path.display()))),
        }
    }

    async fn clear_all(&self, namespace: &str) -> BrrResult<()> {
        let dir = self.namespace_dir(namespace);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::debug!(namespace, "cleared cache namespace");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BrrError::cache_io(format!("clear_all {}: {e}", dir.display()))),
        }
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;
