// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access and timing constants.
//!
//! Every tunable timeout lives here as a named accessor rather than a
//! scattered literal, one `fn` per tunable.

use std::time::Duration;

/// Versioned prefix under which every cache key lives. Bumping this
/// invalidates caches on upgrade.
pub const CACHE_NAMESPACE_PREFIX: &str = "brr-sw-state-v3";

/// Reserved bundle id for the runtime-asset namespace.
pub const RUNTIME_BUNDLE_ID: &str = "_runtime";

/// Health probe period: `BRR_HEALTH_PROBE_MS`, default 5s.
pub fn health_probe_interval() -> Duration {
    env_duration_ms("BRR_HEALTH_PROBE_MS", 5_000)
}

/// Delay after a reconnect attempt before re-probing: `BRR_RECONNECT_PROBE_DELAY_MS`, default 1s.
pub fn reconnect_probe_delay() -> Duration {
    env_duration_ms("BRR_RECONNECT_PROBE_DELAY_MS", 1_000)
}

/// Exponential backoff cap: `BRR_RECONNECT_BACKOFF_CAP_MS`, default 30s.
pub fn reconnect_backoff_cap() -> Duration {
    env_duration_ms("BRR_RECONNECT_BACKOFF_CAP_MS", 30_000)
}

/// Reconnect attempt count after which the counter resets: default 10.
pub fn reconnect_attempt_reset() -> u32 {
    std::env::var("BRR_RECONNECT_ATTEMPT_RESET")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(10)
}

/// PathIndex sync wait timeout: `BRR_PATH_INDEX_SYNC_MS`, default 1s.
pub fn path_index_sync_timeout() -> Duration {
    env_duration_ms("BRR_PATH_INDEX_SYNC_MS", 1_000)
}

/// Auto-init race timeout: `BRR_AUTO_INIT_TIMEOUT_MS`, default 15s.
pub fn auto_init_timeout() -> Duration {
    env_duration_ms("BRR_AUTO_INIT_TIMEOUT_MS", 15_000)
}

/// Dev proxy upstream base: `BRR_DEV_PROXY_BASE`, default
/// `http://localhost:4001`.
pub fn dev_proxy_base() -> String {
    std::env::var("BRR_DEV_PROXY_BASE").unwrap_or_else(|_| "http://localhost:4001".to_string())
}

/// Whether dev-server proxying is enabled (build-time flag `SERVE_LOCAL`).
///
/// Modeled as a runtime env flag (`BRR_SERVE_LOCAL`) rather than a true
/// build-time constant so the same binary can be exercised both ways in
/// tests.
pub fn serve_local() -> bool {
    std::env::var("BRR_SERVE_LOCAL").map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

fn env_duration_ms(key: &str, default_ms: u64) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(default_ms))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
