// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The named cache blob payloads persisted per bundle namespace.

use serde::{Deserialize, Serialize};

/// `appSlug` blob payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSlugBlob {
    pub slug: String,
}

/// `wsUrl` blob payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsUrlBlob {
    pub url: String,
}

/// `namespace` blob payload. Always equal to the bundle's `launcherBundleId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceBlob {
    pub namespace: String,
}

/// `lastActiveBundleId` blob payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastActiveBundleIdBlob {
    pub id: String,
}

/// The fixed set of cache keys a bundle's persisted state occupies.
///
/// `bundleBytes` is not a JSON blob like the others — it's the raw,
/// potentially large octet stream of the serialized bundle, so it's
/// addressed directly by [`CacheKey::BUNDLE_BYTES`] rather than through a
/// typed wrapper struct.
pub struct CacheKey;

impl CacheKey {
    pub const APP_SLUG: &'static str = "appSlug";
    pub const BUNDLE_BYTES: &'static str = "bundleBytes";
    pub const WS_URL: &'static str = "wsUrl";
    pub const NAMESPACE: &'static str = "namespace";
    pub const LAST_ACTIVE_BUNDLE_ID: &'static str = "lastActiveBundleId";

    /// All keys, for the all-or-nothing group clear.
    pub const ALL: [&'static str; 5] =
        [Self::APP_SLUG, Self::BUNDLE_BYTES, Self::WS_URL, Self::NAMESPACE, Self::LAST_ACTIVE_BUNDLE_ID];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_named_key_exactly_once() {
        let mut keys = CacheKey::ALL.to_vec();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CacheKey::ALL.len());
    }
}
