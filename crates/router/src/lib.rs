// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! brr-router: the URL classifier and VFS path resolver.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod path;
mod route;

pub use path::resolve_vfs_path;
pub use route::{classify, ClassifyInput, Route, RESERVED_RUNTIME_ASSETS};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn path_resolution_is_idempotent(
            bundle_id in "[a-z0-9]{1,8}",
            app_slug in "[a-z0-9]{1,8}",
            segments in proptest::collection::vec("[a-z0-9]{1,6}", 0..4),
        ) {
            let remaining = segments.join("/");
            let once = resolve_vfs_path(&bundle_id, &app_slug, &remaining);
            let twice = resolve_vfs_path(&bundle_id, &app_slug, &once);
            prop_assert_eq!(once, twice);
        }
    }
}
