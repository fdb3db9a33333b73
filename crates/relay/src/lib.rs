//! Barcode Buddy relay
//!
//! Serves the bundled scanner page and forwards three browser calls to the
//! Barcode Buddy API, attaching the shared secret server-side so it never
//! reaches the browser.
//!
//! | Inbound | Upstream |
//! |---|---|
//! | `POST /api/scan` | `POST /api/action/scan` (multipart) |
//! | `GET /api/state/getmode` | `GET /api/state/getmode` |
//! | `POST /api/state/setmode` | `POST /api/state/setmode` (urlencoded) |
//!
//! Upstream status codes and bodies are passed through unchanged. Requests
//! the relay rejects itself never reach the upstream.
//!
//! ```ignore
//! let forwarder = relay::Forwarder::new(&config.upstream)?;
//! let router = relay::relay_routes(Arc::new(relay::RelayState::new(forwarder)));
//! ```

pub mod assets;
pub mod endpoint;
pub mod error;
pub mod form;
pub mod forwarder;
pub mod handlers;
pub mod routes;

pub use endpoint::{BodyEncoding, Endpoint, FieldKind, FieldSpec, GET_MODE, SCAN, SET_MODE};
pub use error::RelayError;
pub use form::FormFields;
pub use forwarder::{Forwarder, API_KEY_HEADER};
pub use handlers::RelayState;
pub use routes::relay_routes;
