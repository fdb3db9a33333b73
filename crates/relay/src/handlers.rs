//! Axum handlers for the forwarding endpoints
//!
//! Routes accept any method so the relay can answer a wrong method with its
//! own plain-text `405` instead of the router's empty one.

use axum::extract::State;
use axum::http::Method;
use axum::response::Response;
use std::sync::Arc;

use crate::endpoint::{GET_MODE, SCAN, SET_MODE};
use crate::form::FormFields;
use crate::forwarder::Forwarder;

/// Shared handler state, built once at startup
pub struct RelayState {
    pub forwarder: Forwarder,
}

impl RelayState {
    pub fn new(forwarder: Forwarder) -> Self {
        Self { forwarder }
    }
}

/// `POST /api/scan`
pub async fn scan(
    State(state): State<Arc<RelayState>>,
    method: Method,
    form: FormFields,
) -> Response {
    state.forwarder.relay(&SCAN, &method, &form).await
}

/// `GET /api/state/getmode`
pub async fn get_mode(
    State(state): State<Arc<RelayState>>,
    method: Method,
    form: FormFields,
) -> Response {
    state.forwarder.relay(&GET_MODE, &method, &form).await
}

/// `POST /api/state/setmode`
pub async fn set_mode(
    State(state): State<Arc<RelayState>>,
    method: Method,
    form: FormFields,
) -> Response {
    state.forwarder.relay(&SET_MODE, &method, &form).await
}
