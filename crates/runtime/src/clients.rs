// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connected-client registry: forwards replies and broadcasts to the
//! originating client only.

use brr_core::ClientId;
use brr_wire::Reply;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Maps each connected client to the channel its replies/broadcasts go out
/// on. One registry is shared by the whole runtime.
#[derive(Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<ClientId, mpsc::Sender<Reply>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, client_id: ClientId, sender: mpsc::Sender<Reply>) {
        self.clients.lock().insert(client_id, sender);
    }

    pub fn unregister(&self, client_id: &ClientId) {
        self.clients.lock().remove(client_id);
    }

    /// Delivers `reply` to exactly `client_id`. Drops with a warning if the
    /// client has disconnected; the watcher itself is left registered.
    pub async fn send_to(&self, client_id: &ClientId, reply: Reply) {
        let sender = self.clients.lock().get(client_id).cloned();
        match sender {
            Some(tx) => {
                if tx.send(reply).await.is_err() {
                    tracing::warn!(client_id = %client_id, "client channel closed, dropping reply");
                }
            }
            None => tracing::warn!(client_id = %client_id, "client not connected, dropping reply"),
        }
    }

    /// Delivers `reply` to every currently-registered client.
    pub async fn broadcast(&self, reply: Reply) {
        let senders: Vec<_> = self.clients.lock().values().cloned().collect();
        for tx in senders {
            let _ = tx.send(reply.clone()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brr_wire::Reply;

    #[tokio::test]
    async fn send_to_unregistered_client_does_not_panic() {
        let registry = ClientRegistry::new();
        registry.send_to(&"ghost".into(), Reply::ok("ping", None, None)).await;
    }

    #[tokio::test]
    async fn send_to_delivers_only_to_the_named_client() {
        let registry = ClientRegistry::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        registry.register("a".into(), tx_a);
        registry.register("b".into(), tx_b);

        registry.send_to(&"a".into(), Reply::ok("ping", None, None)).await;

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_reaches_every_registered_client() {
        let registry = ClientRegistry::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        registry.register("a".into(), tx_a);
        registry.register("b".into(), tx_b);

        registry.broadcast(Reply::ok("ready", None, None)).await;

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }
}
