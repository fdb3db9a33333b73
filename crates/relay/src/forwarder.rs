//! Upstream forwarding
//!
//! The [`Forwarder`] owns one pooled HTTP client and the resolved upstream
//! target. For every inbound request it validates, rebuilds the request for
//! the upstream API, and passes the upstream status and body back unchanged.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use config::{UpstreamConfig, UpstreamTarget};
use observability::RelayMetrics;
use reqwest::multipart;
use tracing::{error, info, warn};

use crate::endpoint::{BodyEncoding, Endpoint};
use crate::error::RelayError;
use crate::form::FormFields;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "BBUDDY-API-KEY";

#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    upstream: Option<UpstreamTarget>,
}

impl Forwarder {
    /// Build the shared client. A missing host or secret is not an error
    /// here; it surfaces per request as [`RelayError::NotConfigured`].
    pub fn new(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(RelayError::ClientBuild)?;

        Ok(Self {
            client,
            upstream: config.target(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.upstream.is_some()
    }

    /// Handle one inbound request for `endpoint`
    pub async fn relay(&self, endpoint: &Endpoint, method: &Method, form: &FormFields) -> Response {
        let metrics = RelayMetrics::new(endpoint.name);
        metrics.record_request();

        match self.forward(endpoint, method, form, metrics).await {
            Ok(response) => response,
            Err(err) => {
                metrics.record_rejection(err.reject_reason());
                if err.status().is_server_error() {
                    error!(endpoint = endpoint.name, error = %err, "Relay request failed");
                } else {
                    warn!(endpoint = endpoint.name, error = %err, "Rejected relay request");
                }
                err.into_response()
            }
        }
    }

    async fn forward(
        &self,
        endpoint: &Endpoint,
        method: &Method,
        form: &FormFields,
        metrics: RelayMetrics,
    ) -> Result<Response, RelayError> {
        if *method != endpoint.method {
            return Err(RelayError::MethodNotAllowed(method.clone()));
        }

        let fields = endpoint.extract(form)?;
        let target = self.upstream.as_ref().ok_or(RelayError::NotConfigured)?;
        let url = target.url(endpoint.upstream_path);

        let mut builder = self
            .client
            .request(endpoint.method.clone(), &url)
            .header(API_KEY_HEADER, &target.api_key);

        builder = match endpoint.encoding {
            BodyEncoding::Empty => builder,
            BodyEncoding::UrlEncoded => builder.form(&fields),
            BodyEncoding::Multipart => {
                let body = fields
                    .clone()
                    .into_iter()
                    .fold(multipart::Form::new(), |body, (name, value)| {
                        body.text(name, value)
                    });
                builder.multipart(body)
            }
        };

        let request = builder.build().map_err(RelayError::RequestBuild)?;

        info!(
            endpoint = endpoint.name,
            %method,
            ?fields,
            %url,
            "Forwarding request upstream"
        );

        let timer = metrics.start_upstream();
        let upstream = self
            .client
            .execute(request)
            .await
            .map_err(RelayError::Forward)?;

        let status = upstream.status();
        let body = match upstream.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(endpoint = endpoint.name, error = %e, "Failed to read upstream body");
                Default::default()
            }
        };
        let elapsed = timer.finish(status.as_u16());

        info!(
            endpoint = endpoint.name,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            body = %String::from_utf8_lossy(&body),
            "Upstream responded"
        );

        Ok(passthrough(status, body, endpoint.json_response))
    }
}

fn passthrough(status: StatusCode, body: axum::body::Bytes, json: bool) -> Response {
    let mut response = Body::from(body).into_response();
    *response.status_mut() = status;
    if json {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{GET_MODE, SCAN};
    use axum::body::to_bytes;
    use config::UpstreamScheme;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_unconfigured_forwarder_builds() {
        let forwarder = Forwarder::new(&UpstreamConfig::default()).unwrap();
        assert!(!forwarder.is_configured());

        let forwarder = Forwarder::new(&UpstreamConfig::new("bbuddy.local", "k")).unwrap();
        assert!(forwarder.is_configured());
    }

    #[tokio::test]
    async fn test_method_checked_before_configuration() {
        let forwarder = Forwarder::new(&UpstreamConfig::default()).unwrap();

        let response = forwarder.relay(&SCAN, &Method::GET, &FormFields::default()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unconfigured_rejections() {
        let forwarder = Forwarder::new(&UpstreamConfig::default()).unwrap();

        let response = forwarder.relay(&SCAN, &Method::POST, &FormFields::default()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = forwarder
            .relay(&GET_MODE, &Method::GET, &FormFields::default())
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_request_and_upstream_body_logged_at_info() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/action/scan"))
            .respond_with(ResponseTemplate::new(200).set_body_string("scan-accepted"))
            .mount(&server)
            .await;

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let upstream = UpstreamConfig::new(server.address().to_string(), "secret-key")
            .with_scheme(UpstreamScheme::Http);
        let forwarder = Forwarder::new(&upstream).unwrap();
        let response = forwarder
            .relay(&SCAN, &Method::POST, &FormFields::from([("barcode", "4006381333931")]))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("POST"));
        assert!(output.contains("4006381333931"));
        assert!(output.contains("/api/action/scan"));
        assert!(output.contains("scan-accepted"));
        assert!(!output.contains("secret-key"));
    }

    #[tokio::test]
    async fn test_passthrough_content_type() {
        let response = passthrough(StatusCode::CREATED, "ok".into(), false);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");

        let response = passthrough(StatusCode::OK, "{}".into(), true);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }
}
