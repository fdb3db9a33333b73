//! Bundled scanner page
//!
//! The page, its script, and its stylesheet are compiled into the binary.

use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::error::{text_error, RelayError};

/// One embedded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub content_type: &'static str,
    pub bytes: &'static [u8],
}

const INDEX: Asset = Asset {
    content_type: "text/html; charset=utf-8",
    bytes: include_bytes!("../static/index.html"),
};

const SCRIPT: Asset = Asset {
    content_type: "text/javascript; charset=utf-8",
    bytes: include_bytes!("../static/script.js"),
};

const STYLE: Asset = Asset {
    content_type: "text/css; charset=utf-8",
    bytes: include_bytes!("../static/style.css"),
};

/// Resolve a request path to an embedded file
pub fn lookup(path: &str) -> Option<Asset> {
    match path {
        "/" | "/index.html" => Some(INDEX),
        "/script.js" => Some(SCRIPT),
        "/style.css" => Some(STYLE),
        _ => None,
    }
}

/// Router fallback: serve an embedded file or 404
pub async fn serve_asset(method: Method, uri: Uri) -> Response {
    let Some(asset) = lookup(uri.path()) else {
        return text_error(StatusCode::NOT_FOUND, "404 page not found");
    };

    if method == Method::HEAD {
        return ([(CONTENT_TYPE, asset.content_type)], ()).into_response();
    }
    if method != Method::GET {
        return RelayError::MethodNotAllowed(method).into_response();
    }

    ([(CONTENT_TYPE, asset.content_type)], asset.bytes).into_response()
}
