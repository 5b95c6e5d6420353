// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared runtime context: a single owning value passed to handlers.
//!
//! One struct bundling every shared collaborator behind `Arc`, handed to
//! every handler instead of reaching for globals.

use crate::clients::ClientRegistry;
use crate::registry::BundleRegistry;
use brr_cache::CacheStore;
use brr_core::SharedOnce;
use brr_vfs::{BundleParser, VfsFactory};
use std::sync::Arc;

/// Everything a dispatcher, loader, fetch interceptor, or health controller
/// needs, held behind `Arc` so every task can share one instance.
pub struct RuntimeCtx {
    pub registry: BundleRegistry,
    pub clients: ClientRegistry,
    pub vfs_factory: Arc<dyn VfsFactory>,
    pub bundle_parser: Arc<dyn BundleParser>,
    pub cache: Arc<dyn CacheStore>,
    /// The server's own canonical URL, returned by `getServerUrl`.
    pub server_url: String,
    /// Resolves once auto-init has either recovered a bundle or given up.
    /// Unresolved until [`crate::autoinit::run`] is invoked.
    pub auto_init: SharedOnce<()>,
}

impl RuntimeCtx {
    pub fn new(
        vfs_factory: Arc<dyn VfsFactory>,
        bundle_parser: Arc<dyn BundleParser>,
        cache: Arc<dyn CacheStore>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            registry: BundleRegistry::new(),
            clients: ClientRegistry::new(),
            vfs_factory,
            bundle_parser,
            cache,
            server_url: server_url.into(),
            auto_init: SharedOnce::new(),
        }
    }
}
