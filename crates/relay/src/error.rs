//! Relay error types
//!
//! Every error renders itself as the HTTP response the caller sees. Plain
//! text bodies end in a newline; the non-integer case uses the structured
//! JSON envelope the upstream API itself speaks.

use axum::http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use observability::RejectReason;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Invalid {field} value: {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("Missing env vars: BBUDDY_HOST or BBUDDY_API_KEY")]
    NotConfigured,

    #[error("Failed to create request: {0}")]
    RequestBuild(#[source] reqwest::Error),

    #[error("Failed to forward request: {0}")]
    Forward(#[source] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingField(_) | Self::InvalidInteger { .. } => StatusCode::BAD_REQUEST,
            Self::NotConfigured
            | Self::RequestBuild(_)
            | Self::Forward(_)
            | Self::ClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn reject_reason(&self) -> RejectReason {
        match self {
            Self::MethodNotAllowed(_) => RejectReason::MethodNotAllowed,
            Self::MissingField(_) | Self::InvalidInteger { .. } => RejectReason::InvalidInput,
            Self::NotConfigured | Self::ClientBuild(_) => RejectReason::NotConfigured,
            Self::RequestBuild(_) => RejectReason::RequestBuild,
            Self::Forward(_) => RejectReason::Transport,
        }
    }

    /// Caller-facing message; never includes upstream or secret details
    fn public_message(&self) -> String {
        match self {
            Self::MethodNotAllowed(_) => "Method not allowed".to_string(),
            Self::MissingField(field) => format!("Missing {}", field),
            Self::InvalidInteger { field, .. } => format!("Invalid {} provided", field),
            Self::NotConfigured | Self::ClientBuild(_) => "Server configuration error".to_string(),
            Self::RequestBuild(_) => "Failed to create request".to_string(),
            Self::Forward(_) => "Failed to forward request".to_string(),
        }
    }
}

/// Result envelope used by the upstream API
#[derive(Debug, Serialize)]
pub struct ResultEnvelope {
    pub data: Option<serde_json::Value>,
    pub result: ResultInfo,
}

#[derive(Debug, Serialize)]
pub struct ResultInfo {
    pub result: String,
    pub http_code: u16,
}

/// Plain-text error response
pub fn text_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        format!("{}\n", message),
    )
        .into_response()
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::InvalidInteger { .. } => (
                status,
                Json(vec![ResultEnvelope {
                    data: None,
                    result: ResultInfo {
                        result: self.public_message(),
                        http_code: status.as_u16(),
                    },
                }]),
            )
                .into_response(),
            _ => text_error(status, &self.public_message()),
        }
    }
}
