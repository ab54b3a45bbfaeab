//! Set of live WebSocket connections.
//!
//! [`ConnectionRegistry`] records which connections are currently open
//! and when each one arrived. Delivery itself goes through the
//! [`super::EventBus`]; the registry is what the relay consults for
//! membership and counts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::ConnectionId;

/// Registry of active connections keyed by [`ConnectionId`].
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, DateTime<Utc>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection. Returns `false` if it was already registered.
    pub async fn register(&self, id: ConnectionId) -> bool {
        let mut map = self.connections.write().await;
        if map.contains_key(&id) {
            return false;
        }
        map.insert(id, Utc::now());
        true
    }

    /// Removes a connection, returning when it was registered.
    pub async fn unregister(&self, id: ConnectionId) -> Option<DateTime<Utc>> {
        self.connections.write().await.remove(&id)
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }
}
