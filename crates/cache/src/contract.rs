// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The KV cache contract: a byte-addressable store namespaced by bundle id.

use async_trait::async_trait;
use brr_core::BrrResult;

/// A byte-addressable KV cache, namespaced by bundle.
///
/// Writes are last-wins; there is no transactional grouping beyond
/// [`CacheStore::clear_all`]. Callers treat every operation as best-effort:
/// a [`brr_core::BrrError::CacheIo`] is logged and never escalated to a
/// fatal error.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the bytes stored at `namespace`/`key`, or `None` if absent.
    async fn get(&self, namespace: &str, key: &str) -> BrrResult<Option<Vec<u8>>>;

    /// Writes `value` to `namespace`/`key`, replacing any prior value.
    async fn put(&self, namespace: &str, key: &str, value: Vec<u8>) -> BrrResult<()>;

    /// Removes `namespace`/`key` if present. Absence is not an error.
    async fn delete(&self, namespace: &str, key: &str) -> BrrResult<()>;

    /// Removes every key in `namespace` as a single all-or-nothing group
    /// operation.
    async fn clear_all(&self, namespace: &str) -> BrrResult<()>;
}
