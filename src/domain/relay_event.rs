//! Events exchanged between clients through the relay.
//!
//! A [`RelayEvent`] is both the inbound command a client sends and the
//! outbound notification the relay forwards. Outbound, every event is a
//! JSON object with an `event` name and, except for the wipe, a `payload`:
//!
//! ```json
//! {"event": "newCameraView", "payload": {"id": 1}}
//! {"event": "synchWithMe", "payload": "anything"}
//! {"event": "wipeAllViews"}
//! ```
//!
//! Inbound frames are more lenient; see [`crate::ws::messages::decode`].

use serde::Serialize;

use super::{ConnectionId, ViewRecord};

/// One of the three events the relay understands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum RelayEvent {
    /// Ask every other client to synchronize with the sender.
    SynchWithMe(serde_json::Value),
    /// A camera view was added.
    NewCameraView(ViewRecord),
    /// All stored views were discarded.
    WipeAllViews,
}

impl RelayEvent {
    /// Returns the wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SynchWithMe(_) => "synchWithMe",
            Self::NewCameraView(_) => "newCameraView",
            Self::WipeAllViews => "wipeAllViews",
        }
    }

    /// Returns the payload carried by the event, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::SynchWithMe(value) => Some(value),
            Self::NewCameraView(view) => Some(view.as_value()),
            Self::WipeAllViews => None,
        }
    }
}

/// A [`RelayEvent`] tagged with the connection that caused it.
///
/// This is the unit carried on the [`super::EventBus`]. Every connection
/// receives every broadcast and drops the ones it originated.
#[derive(Debug, Clone)]
pub struct Broadcast {
    /// Connection the event came from.
    pub origin: ConnectionId,
    /// The forwarded event.
    pub event: RelayEvent,
}

impl Broadcast {
    /// Creates a broadcast of `event` originating from `origin`.
    #[must_use]
    pub const fn new(origin: ConnectionId, event: RelayEvent) -> Self {
        Self { origin, event }
    }

    /// Returns `true` if `connection` should receive this broadcast.
    #[must_use]
    pub fn is_visible_to(&self, connection: ConnectionId) -> bool {
        self.origin != connection
    }
}
