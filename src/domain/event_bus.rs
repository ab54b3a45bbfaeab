//! Broadcast channel for relay events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every relayed
//! event is published through the bus as a [`Broadcast`], and every
//! WebSocket connection holds one receiver.

use tokio::sync::broadcast;

use super::Broadcast;

/// Broadcast bus for [`Broadcast`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for
/// lagging receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Broadcast>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. [`crate::config::RelayConfig`]
    /// rejects a zero capacity before it gets here.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a broadcast to all subscribers.
    ///
    /// Returns the number of receivers that received it. With no active
    /// receivers the broadcast is silently dropped.
    pub fn publish(&self, broadcast: Broadcast) -> usize {
        self.sender.send(broadcast).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future broadcasts.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Broadcast> {
        self.sender.subscribe()
    }
}
