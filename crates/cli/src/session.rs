// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds an in-process runtime backed entirely by fakes, so every
//! diagnostic command exercises the real dispatcher and loader against a
//! throwaway bundle instead of a mock of the CLI's own making.

use brr_cache::MemoryCacheStore;
use brr_runtime::RuntimeCtx;
use brr_vfs::fake::{FakeBundleParser, FakeVfsFactory};
use std::sync::Arc;

pub fn build_ctx() -> Arc<RuntimeCtx> {
    Arc::new(RuntimeCtx::new(
        Arc::new(FakeVfsFactory),
        Arc::new(FakeBundleParser),
        Arc::new(MemoryCacheStore::new()),
        "http://localhost:3000",
    ))
}
