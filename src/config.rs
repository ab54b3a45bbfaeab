//! Relay configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`) and fall back to the defaults the browser client expects:
//! port 5733, pages under `/screeniverse`, the socket at
//! `/screeniverse-socket-io`.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::RelayError;

/// Default bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5733";
/// Default HTTP mount point.
pub const DEFAULT_BASE_PATH: &str = "/screeniverse";
/// Default WebSocket path.
pub const DEFAULT_SOCKET_PATH: &str = "/screeniverse-socket-io";
/// Default static asset directory.
pub const DEFAULT_STATIC_DIR: &str = "client";
/// Default entry document.
pub const DEFAULT_ENTRY_DOCUMENT: &str = "client/screens.html";
/// Default capacity of the broadcast bus.
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 1024;

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Mount point of the entry document, the wipe route and the assets.
    pub base_path: String,

    /// Path of the WebSocket endpoint.
    pub socket_path: String,

    /// Directory the static assets are served from.
    pub static_dir: PathBuf,

    /// HTML document returned for `GET <base_path>`.
    pub entry_document: PathBuf,

    /// Capacity of the broadcast bus.
    pub event_bus_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5733)),
            base_path: DEFAULT_BASE_PATH.to_string(),
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            entry_document: PathBuf::from(DEFAULT_ENTRY_DOCUMENT),
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `LISTEN_ADDR` cannot be parsed or
    /// any value fails [`RelayConfig::validate`].
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .map_err(|e| RelayError::Config(format!("LISTEN_ADDR {raw_addr:?}: {e}")))?;

        let config = Self {
            listen_addr,
            base_path: lookup("RELAY_BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            socket_path: lookup("RELAY_SOCKET_PATH")
                .unwrap_or_else(|| DEFAULT_SOCKET_PATH.to_string()),
            static_dir: lookup("RELAY_STATIC_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            entry_document: lookup("RELAY_ENTRY_DOCUMENT")
                .map_or_else(|| PathBuf::from(DEFAULT_ENTRY_DOCUMENT), PathBuf::from),
            event_bus_capacity: parse_or(
                lookup("EVENT_BUS_CAPACITY"),
                DEFAULT_EVENT_BUS_CAPACITY,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the route paths and bus capacity.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] when a path is not absolute, ends
    /// with `/`, is the root, when the socket path equals the base path,
    /// or when the bus capacity is zero.
    pub fn validate(&self) -> Result<(), RelayError> {
        validate_route("RELAY_BASE_PATH", &self.base_path)?;
        validate_route("RELAY_SOCKET_PATH", &self.socket_path)?;
        if self.socket_path == self.base_path {
            return Err(RelayError::Config(format!(
                "RELAY_SOCKET_PATH must differ from RELAY_BASE_PATH ({})",
                self.base_path
            )));
        }
        if self.event_bus_capacity == 0 {
            return Err(RelayError::Config(
                "EVENT_BUS_CAPACITY must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the route that clears every stored view.
    #[must_use]
    pub fn wipe_path(&self) -> String {
        format!("{}/wipe", self.base_path)
    }
}

fn validate_route(key: &str, path: &str) -> Result<(), RelayError> {
    if !path.starts_with('/') || path.len() < 2 || path.ends_with('/') {
        return Err(RelayError::Config(format!(
            "{key} must start with '/', must not end with '/' and must not be the root, got {path:?}"
        )));
    }
    Ok(())
}

/// Parses an optional raw value as `T`, returning `default` on missing or
/// invalid values.
fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}
