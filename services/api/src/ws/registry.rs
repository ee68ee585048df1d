//! Connection Registry
//!
//! Tracks the set of currently open WebSocket connections. Every connection
//! handler runs in its own task, so the registry must tolerate concurrent
//! register/unregister calls. The lock is never held across an await point.

use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Bookkeeping data for one open connection.
#[derive(Debug, Clone)]
pub struct ConnectionEntry {
    /// Peer address or label, for diagnostics.
    pub peer: String,
}

/// A concurrency-safe set of open connections.
///
/// Keyed by connection id so that membership checks and removal are O(1).
/// Nothing iterates the map today, but keeping entries per connection leaves
/// room for broadcast-style features later.
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<Uuid, ConnectionEntry>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Adds a connection to the registry.
    pub async fn register(&self, id: Uuid, peer: impl Into<String>) {
        let mut connections = self.connections.lock().await;
        connections.insert(id, ConnectionEntry { peer: peer.into() });
    }

    /// Removes a connection if present. Removing an absent connection is a
    /// no-op, which makes unregistration safe on every exit path.
    pub async fn unregister(&self, id: Uuid) -> bool {
        let mut connections = self.connections.lock().await;
        connections.remove(&id).is_some()
    }

    /// Whether the connection is currently registered.
    pub async fn contains(&self, id: Uuid) -> bool {
        self.connections.lock().await.contains_key(&id)
    }

    /// Number of currently open connections.
    pub async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
