//! Service layer: relay orchestration.
//!
//! [`RelayService`] owns the view store, tracks connections and emits
//! every relayed event through the [`super::domain::EventBus`].

pub mod relay_service;

pub use relay_service::{RelayService, Session};
