// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! brr-wire: the client message envelope and the dispatcher's operation
//! kinds.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod base64_bytes;
mod broadcast;
mod request;
mod response;

pub use broadcast::Broadcast;
pub use request::{Operation, Request, LIFECYCLE_WHITELIST};
pub use response::Reply;
