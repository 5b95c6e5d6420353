// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn resolves_before_wait_returns_immediately() {
    let signal: SharedOnce<u32> = SharedOnce::new();
    signal.complete(7);
    assert_eq!(signal.wait().await, 7);
    assert_eq!(signal.get(), Some(7));
}

#[tokio::test]
async fn many_waiters_all_see_the_same_resolution() {
    let signal: SharedOnce<&'static str> = SharedOnce::new();
    let waiters: Vec<_> = (0..5)
        .map(|_| {
            let s = signal.clone();
            tokio::spawn(async move { s.wait().await })
        })
        .collect();

    // Give the waiters a chance to subscribe before resolving.
    tokio::task::yield_now().await;
    signal.complete("done");

    for w in waiters {
        assert_eq!(w.await.unwrap(), "done");
    }
}

#[tokio::test]
async fn second_complete_call_is_a_no_op() {
    let signal: SharedOnce<u32> = SharedOnce::new();
    signal.complete(1);
    signal.complete(2);
    assert_eq!(signal.get(), Some(1));
}

#[test]
fn is_resolved_reflects_completion_state() {
    let signal: SharedOnce<u32> = SharedOnce::new();
    assert!(!signal.is_resolved());
    signal.complete(1);
    assert!(signal.is_resolved());
}
