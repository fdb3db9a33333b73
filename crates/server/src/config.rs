//! Server configuration
//!
//! Bind address for the relay's HTTP listener.

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// HTTP listener configuration
///
/// # Example
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 8080);
/// assert_eq!(config.addr().unwrap().port(), 8080);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// HTTP port; `0` lets the operating system pick one
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Loopback listener on an ephemeral port (handy for tests)
    pub fn ephemeral() -> Self {
        Self::new("127.0.0.1", 0)
    }

    /// Get the socket address to bind
    pub fn addr(&self) -> Result<SocketAddr> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };

        format!("{}:{}", host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}
