//! Relay service: owns the view store and fans events out to connections.

use tokio::sync::{Mutex, broadcast};

use crate::domain::{
    Broadcast, ConnectionId, ConnectionRegistry, EventBus, RelayEvent, ViewRecord, ViewStore,
};

/// Orchestration layer for every relay operation.
///
/// The [`ViewStore`] lives behind a single mutex. Every mutation holds
/// that lock while it publishes on the [`EventBus`], so the order in which
/// views are appended is the order in which they are broadcast. Connecting
/// takes the same lock to subscribe and snapshot together, so a newcomer
/// sees each view exactly once: either in its replay or as a broadcast.
#[derive(Debug)]
pub struct RelayService {
    views: Mutex<ViewStore>,
    registry: ConnectionRegistry,
    event_bus: EventBus,
}

/// Per-connection handle returned by [`RelayService::connect`].
///
/// Holds the views to replay and the bus receiver. Broadcasts originated
/// by this connection are skipped.
#[derive(Debug)]
pub struct Session {
    id: ConnectionId,
    replay: Vec<ViewRecord>,
    events: broadcast::Receiver<Broadcast>,
}

impl Session {
    /// Returns the connection's identity.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Takes the views stored at connect time, in store order.
    ///
    /// Returns an empty list on every call after the first.
    pub fn take_replay(&mut self) -> Vec<ViewRecord> {
        std::mem::take(&mut self.replay)
    }

    /// Waits for the next event originated by another connection.
    ///
    /// Returns `None` once the bus is closed. Cancel-safe.
    pub async fn next_event(&mut self) -> Option<RelayEvent> {
        loop {
            match self.events.recv().await {
                Ok(broadcast) if broadcast.is_visible_to(self.id) => {
                    return Some(broadcast.event);
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        connection = %self.id,
                        lagged = n,
                        "connection lagged behind event bus"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl RelayService {
    /// Creates a service with an empty store and a bus of `bus_capacity`.
    #[must_use]
    pub fn new(bus_capacity: usize) -> Self {
        Self {
            views: Mutex::new(ViewStore::new()),
            registry: ConnectionRegistry::new(),
            event_bus: EventBus::new(bus_capacity),
        }
    }

    /// Registers a new connection and snapshots the views to replay.
    pub async fn connect(&self) -> Session {
        let id = ConnectionId::new();
        let views = self.views.lock().await;
        let events = self.event_bus.subscribe();
        let replay = views.snapshot();
        self.registry.register(id).await;
        drop(views);

        tracing::info!(connection = %id, replay = replay.len(), "client connected");
        Session { id, replay, events }
    }

    /// Removes a connection. Touches neither the store nor the bus.
    pub async fn disconnect(&self, id: ConnectionId) {
        if let Some(since) = self.registry.unregister(id).await {
            let connected = chrono::Utc::now() - since;
            tracing::info!(
                connection = %id,
                connected_ms = connected.num_milliseconds(),
                "client disconnected"
            );
        } else {
            tracing::debug!(connection = %id, "disconnect for unknown connection");
        }
    }

    /// Applies an inbound event from `origin` and forwards it to every
    /// other connection. Returns the number of bus receivers reached,
    /// origin included.
    pub async fn handle(&self, origin: ConnectionId, event: RelayEvent) -> usize {
        tracing::info!(connection = %origin, event = event.name(), "relaying event");
        if let Some(payload) = event.payload() {
            tracing::debug!(
                connection = %origin,
                event = event.name(),
                %payload,
                "event payload"
            );
        }
        match event {
            RelayEvent::SynchWithMe(payload) => self.synch_with_me(origin, payload),
            RelayEvent::NewCameraView(view) => self.new_camera_view(origin, view).await,
            RelayEvent::WipeAllViews => self.wipe_all_views(origin).await,
        }
    }

    /// Forwards a synchronization request. No state change.
    pub fn synch_with_me(&self, origin: ConnectionId, payload: serde_json::Value) -> usize {
        self.event_bus.publish(Broadcast::new(origin, RelayEvent::SynchWithMe(payload)))
    }

    /// Appends a view and forwards it.
    pub async fn new_camera_view(&self, origin: ConnectionId, view: ViewRecord) -> usize {
        let mut views = self.views.lock().await;
        views.push(view.clone());
        tracing::debug!(connection = %origin, stored = views.len(), "view appended");
        self.event_bus.publish(Broadcast::new(origin, RelayEvent::NewCameraView(view)))
    }

    /// Clears the store and forwards the wipe, even if it was already empty.
    pub async fn wipe_all_views(&self, origin: ConnectionId) -> usize {
        let mut views = self.views.lock().await;
        let removed = views.clear();
        tracing::debug!(connection = %origin, removed, "views wiped");
        self.event_bus.publish(Broadcast::new(origin, RelayEvent::WipeAllViews))
    }

    /// Clears the store without notifying any connection.
    ///
    /// Backs the HTTP wipe route. Unlike [`RelayService::wipe_all_views`]
    /// nothing is broadcast, so connected clients keep showing their views
    /// until they reload.
    pub async fn reset(&self) -> usize {
        let removed = self.views.lock().await.clear();
        tracing::info!(removed, "views reset over http");
        removed
    }

    /// Returns a copy of the stored views in store order.
    pub async fn views(&self) -> Vec<ViewRecord> {
        self.views.lock().await.snapshot()
    }

    /// Returns the number of stored views.
    pub async fn view_count(&self) -> usize {
        self.views.lock().await.len()
    }

    /// Returns the number of open connections.
    pub async fn connection_count(&self) -> usize {
        self.registry.len().await
    }
}
