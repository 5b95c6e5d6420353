// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy.
//!
//! Every variant here is reachable from a message handler and is captured
//! rather than propagated as a panic; the dispatcher converts any `BrrError`
//! into the wire `{ success: false, error }` reply shape via `Display`.

use thiserror::Error;

/// The six error categories named in the design's error handling section.
#[derive(Debug, Error)]
pub enum BrrError {
    /// Websocket disconnect or similar — handled by the reconnect loop and
    /// never surfaced synchronously to a caller after the initial connect.
    #[error("connection lost: {0}")]
    TransientNetwork(String),

    /// A message arrived before a bundle was active, or without a
    /// resolvable `launcherBundleId`.
    #[error("{0}")]
    ProtocolPrecondition(String),

    /// Bubbled up verbatim from the VFS Core (file-not-found, rename
    /// failure, etc).
    #[error("{0}")]
    Vfs(String),

    /// Manifest parse failure or any other load-time failure; transitions
    /// the bundle to `Error` state and rejects all `Loading` awaiters.
    #[error("{0}")]
    Bundle(String),

    /// Cache I/O failure. Logged, never fatal — callers should treat the
    /// cache as best-effort and continue.
    #[error("cache I/O error: {0}")]
    CacheIo(String),

    /// An unrecognized message `type` arrived at the dispatcher.
    #[error("Unknown message type: {0}")]
    DispatcherUnknown(String),
}

impl BrrError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::ProtocolPrecondition(msg.into())
    }

    pub fn vfs(msg: impl std::fmt::Display) -> Self {
        Self::Vfs(msg.to_string())
    }

    pub fn bundle(msg: impl std::fmt::Display) -> Self {
        Self::Bundle(msg.to_string())
    }

    pub fn cache_io(msg: impl std::fmt::Display) -> Self {
        Self::CacheIo(msg.to_string())
    }
}

pub type BrrResult<T> = Result<T, BrrError>;
