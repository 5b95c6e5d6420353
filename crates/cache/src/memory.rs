// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`CacheStore`] for tests and the diagnostic CLI.

use crate::contract::CacheStore;
use async_trait::async_trait;
use brr_core::BrrResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    blobs: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, namespace: &str, key: &str) -> BrrResult<Option<Vec<u8>>> {
        Ok(self.blobs.lock().get(&(namespace.to_string(), key.to_string())).cloned())
    }

    async fn put(&self, namespace: &str, key: &str, value: Vec<u8>) -> BrrResult<()> {
        self.blobs.lock().insert((namespace.to_string(), key.to_string()), value);
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> BrrResult<()> {
        self.blobs.lock().remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }

    async fn clear_all(&self, namespace: &str) -> BrrResult<()> {
        self.blobs.lock().retain(|(ns, _), _| ns != namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clear_all_only_touches_the_named_namespace() {
        let store = MemoryCacheStore::new();
        store.put("a", "appSlug", b"1".to_vec()).await.unwrap();
        store.put("b", "appSlug", b"2".to_vec()).await.unwrap();

        store.clear_all("a").await.unwrap();

        assert_eq!(store.get("a", "appSlug").await.unwrap(), None);
        assert_eq!(store.get("b", "appSlug").await.unwrap(), Some(b"2".to_vec()));
    }
}
