//! WebSocket layer: upgrade handling, the per-connection loop and frame
//! encoding.
//!
//! The endpoint lives at the configured socket path (by default
//! `/screeniverse-socket-io`), separate from the HTTP pages.

pub mod connection;
pub mod handler;
pub mod messages;
