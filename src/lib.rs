//! # screeniverse-relay
//!
//! WebSocket relay that lets browser clients share camera views.
//!
//! Clients connect over a WebSocket, publish `newCameraView`,
//! `synchWithMe` and `wipeAllViews` events, and the relay forwards each
//! event to every other connected client. Accepted camera views are kept
//! in memory and replayed to each newcomer. A small HTTP surface serves
//! the browser client and a route that clears the stored views.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── Site + System Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── RelayService (service/)
//!     │
//!     ├── ViewStore (domain/)
//!     ├── EventBus + ConnectionRegistry (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete application: HTTP routes, the WebSocket endpoint
/// and the tracing/CORS layers.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router(&state.config))
        .route(&state.config.socket_path, get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
