// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! brr-core: shared data model, ids, config and error types for the
//! Bundle Runtime Router.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod macros;

pub mod cache_blobs;
pub mod config;
pub mod error;
pub mod id;
pub mod manifest;
pub mod signal;

pub use cache_blobs::{AppSlugBlob, CacheKey, LastActiveBundleIdBlob, NamespaceBlob, WsUrlBlob};
pub use error::{BrrError, BrrResult};
pub use id::{ClientId, LauncherBundleId, WatchId, RESERVED_RUNTIME_BUNDLE_ID};
pub use manifest::{http_to_ws, Manifest};
pub use signal::SharedOnce;
