//! Port validation utilities
//!
//! Checking a port before binding is inherently racy: another process can
//! take it between the check and the bind. This only gives early, readable
//! feedback; the bind in [`crate::HttpServer`] is authoritative.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Validate that the configured port is available
///
/// Port `0` is always available and skipped.
pub async fn validate_port_available(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        debug!("Ephemeral port requested, skipping availability check");
        return Ok(());
    }

    if config.port < 1024 {
        warn!(
            "Port {} is a privileged port (requires root/admin privileges)",
            config.port
        );
    }

    let addr = config.addr()?;
    debug!("Checking HTTP port {}", config.port);

    match TcpListener::bind(addr).await {
        Ok(listener) => {
            let local_addr = listener
                .local_addr()
                .map_err(|e| ServerError::bind(addr.to_string(), e))?;

            // Drop the listener to release the port
            drop(listener);

            info!("HTTP port {} is available ({})", config.port, local_addr);
            Ok(())
        }
        Err(e) => {
            error!("HTTP port {} is NOT available: {}", config.port, e);
            Err(ServerError::port_in_use(config.port, e.to_string()))
        }
    }
}
