//! Axum routes for the relay

use axum::routing::any;
use axum::Router;
use std::sync::Arc;

use crate::assets::serve_asset;
use crate::handlers::{get_mode, scan, set_mode, RelayState};

/// Forwarding endpoints plus the bundled page as fallback
pub fn relay_routes(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/api/scan", any(scan))
        .route("/api/state/getmode", any(get_mode))
        .route("/api/state/setmode", any(set_mode))
        .fallback(serve_asset)
        .with_state(state)
}
