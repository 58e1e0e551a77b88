//! Server configuration.

use std::net::SocketAddr;

/// HTTP service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: SocketAddr,

    /// Path every route is mounted under, e.g. `/raman`. Empty mounts at `/`.
    pub route_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], Self::DEFAULT_PORT)),
            route_prefix: String::new(),
        }
    }
}

impl ServerConfig {
    /// Default listen port.
    pub const DEFAULT_PORT: u16 = 5000;

    /// Creates a configuration listening on `bind`.
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            ..Default::default()
        }
    }

    /// Builder: set the route prefix.
    ///
    /// Leading and trailing slashes are normalized, so `raman`, `/raman` and
    /// `/raman/` are the same prefix.
    pub fn with_route_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.route_prefix = normalize_prefix(prefix.as_ref());
        self
    }
}

/// Returns `/segment[/segment...]`, or an empty string for the root.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
