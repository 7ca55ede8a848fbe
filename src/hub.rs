use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::mpsc;

/// One registered client connection.
#[derive(Debug)]
struct ClientHandle {
    peer: SocketAddr,
    tx: mpsc::UnboundedSender<Bytes>,
}

/// Registry of live client connections and the fan-out target for
/// result broadcasts.
#[derive(Debug, Default)]
pub struct ClientHub {
    clients: RwLock<HashMap<u64, ClientHandle>>,
    next_id: AtomicU64,
}

impl ClientHub {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a connection, returning its id and the receiving end of
    /// its outbound byte channel.
    pub fn register(&self, peer: SocketAddr) -> (u64, mpsc::UnboundedReceiver<Bytes>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        let count = {
            let mut clients = self.clients.write();
            clients.insert(id, ClientHandle { peer, tx });
            clients.len()
        };
        log::info!("client {id} connected from {peer}, {count} connection(s) live");
        (id, rx)
    }

    /// Removes a connection. Safe to call more than once for one id.
    pub fn unregister(&self, id: u64) {
        let (removed, count) = {
            let mut clients = self.clients.write();
            (clients.remove(&id), clients.len())
        };
        if let Some(handle) = removed {
            log::info!(
                "client {id} ({}) disconnected, {count} connection(s) live",
                handle.peer
            );
        }
    }

    /// Delivers one already-encoded message to every live connection.
    ///
    /// Iterates over a snapshot of the live set, so concurrent
    /// register/unregister calls cannot invalidate the walk. A failed
    /// delivery deregisters that connection only and never aborts
    /// delivery to the rest. Returns the delivered count.
    pub fn broadcast(&self, message: Bytes) -> usize {
        let snapshot: Vec<(u64, mpsc::UnboundedSender<Bytes>)> = self
            .clients
            .read()
            .iter()
            .map(|(id, handle)| (*id, handle.tx.clone()))
            .collect();

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, tx) in snapshot {
            if tx.send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                log::warn!("failed to queue results for client {id}, dropping it");
                dead.push(id);
            }
        }
        for id in dead {
            self.unregister(id);
        }
        delivered
    }

    pub fn connection_count(&self) -> usize {
        self.clients.read().len()
    }

    /// Drops every connection; their writer tasks observe the closed
    /// channels and shut the sockets down.
    pub fn clear(&self) {
        let mut clients = self.clients.write();
        if !clients.is_empty() {
            log::info!("closing {} client connection(s)", clients.len());
        }
        clients.clear();
    }
}
