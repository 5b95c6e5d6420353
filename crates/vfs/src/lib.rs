// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! brr-vfs: the VFS Core contract plus an in-memory fake used by tests and
//! the diagnostic CLI.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod contract;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use contract::{
    BundleParser, DirectoryChange, DocumentChange, FileMetadata, ReadFileResult, StorageBackend,
    VfsCore, VfsFactory, VfsStorageConfig, WatcherHandle,
};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBundleParser, FakeVfs, FakeVfsFactory, FakeWatcherHandle};
