//! Domain layer: connection identity, stored views, relay events and the
//! broadcast plumbing between connections.

pub mod connection_id;
pub mod connection_registry;
pub mod event_bus;
pub mod relay_event;
pub mod view_store;

pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
pub use event_bus::EventBus;
pub use relay_event::{Broadcast, RelayEvent};
pub use view_store::{ViewRecord, ViewStore};
