// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A "shared one-shot" completion signal: one producer resolves it, any
//! number of cloned handles can await the result.
//!
//! This is the primitive behind the `Loading { completion }` bundle state,
//! the process-wide auto-init completion, and the VFS once-init guard —
//! anywhere the design calls for "many waiters, one producer". Built on
//! `tokio::sync::watch` rather than a bespoke
//! broadcast-once type: `watch::Receiver` is already `Clone`, already
//! buffers the last value for late subscribers, and `changed()` gives us
//! the await point for free.
use std::sync::Arc;
use tokio::sync::watch;

/// A value that starts `None` and is resolved exactly once.
#[derive(Clone)]
pub struct SharedOnce<T: Clone + Send + Sync + 'static> {
    rx: watch::Receiver<Option<T>>,
    tx: Arc<watch::Sender<Option<T>>>,
}

impl<T: Clone + Send + Sync + 'static> SharedOnce<T> {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(None);
        Self { rx, tx: Arc::new(tx) }
    }

    /// Resolve the signal. Subsequent calls are no-ops — the first producer
    /// to call `complete` wins.
    pub fn complete(&self, value: T) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                false
            } else {
                *current = Some(value);
                true
            }
        });
    }

    /// Returns the value if already resolved, without waiting.
    pub fn get(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Waits until the signal is resolved and returns the value.
    ///
    /// If already resolved, returns immediately.
    pub async fn wait(&self) -> T {
        let mut rx = self.rx.clone();
        loop {
            if let Some(v) = rx.borrow().clone() {
                return v;
            }
            // The sender is held by `self` (via `tx: Arc<...>`), so this
            // channel never closes out from under us while `self` is alive.
            if rx.changed().await.is_err() {
                // Sender dropped without resolving — only reachable if every
                // clone of `self` was dropped concurrently with this await,
                // which can't happen since we're holding `self` by reference.
                unreachable!("SharedOnce sender dropped while awaited")
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SharedOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
