//! Prometheus metrics infrastructure
//!
//! This module provides utilities for initializing Prometheus metrics
//! and the per-endpoint metric set recorded by the relay.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Initialize the Prometheus metrics exporter
///
/// This starts an HTTP listener on the specified port that exposes metrics
/// at the `/metrics` endpoint. Until this is called every metric recorded
/// through [`RelayMetrics`] is a no-op.
///
/// # Example
///
/// ```ignore
/// observability::metrics::init_metrics(9090)?;
/// // Metrics available at http://localhost:9090/metrics
/// ```
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Why the relay answered without (successfully) reaching the upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MethodNotAllowed,
    InvalidInput,
    NotConfigured,
    RequestBuild,
    Transport,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::InvalidInput => "invalid_input",
            Self::NotConfigured => "not_configured",
            Self::RequestBuild => "request_build",
            Self::Transport => "transport",
        }
    }
}

/// Metrics for one forwarding endpoint
///
/// # Metrics
///
/// * `relay_requests_total` - Inbound requests reaching the endpoint
/// * `relay_rejections_total` - Requests answered by the relay itself, by reason
/// * `relay_upstream_responses_total` - Upstream responses, by status code
/// * `relay_upstream_duration_seconds` - Upstream round-trip time
///
/// # Example
///
/// ```ignore
/// let metrics = RelayMetrics::new("scan");
/// metrics.record_request();
///
/// let timer = metrics.start_upstream();
/// // ... send upstream request ...
/// timer.finish(200);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RelayMetrics {
    endpoint: &'static str,
}

impl RelayMetrics {
    /// Create metrics for a specific endpoint (e.g., "scan", "getmode")
    pub fn new(endpoint: &'static str) -> Self {
        Self { endpoint }
    }

    pub fn record_request(&self) {
        counter!("relay_requests_total", "endpoint" => self.endpoint).increment(1);
    }

    pub fn record_rejection(&self, reason: RejectReason) {
        counter!(
            "relay_rejections_total",
            "endpoint" => self.endpoint,
            "reason" => reason.as_str()
        )
        .increment(1);
    }

    pub fn record_upstream(&self, status_code: u16, duration: Duration) {
        counter!(
            "relay_upstream_responses_total",
            "endpoint" => self.endpoint,
            "status" => status_code.to_string()
        )
        .increment(1);
        histogram!("relay_upstream_duration_seconds", "endpoint" => self.endpoint)
            .record(duration.as_secs_f64());
    }

    /// Start timing an upstream round trip
    pub fn start_upstream(&self) -> UpstreamTimer {
        UpstreamTimer {
            metrics: *self,
            start: Instant::now(),
        }
    }

    /// Get the endpoint name
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }
}

/// Measures one upstream round trip; consumed by [`UpstreamTimer::finish`]
pub struct UpstreamTimer {
    metrics: RelayMetrics,
    start: Instant,
}

impl UpstreamTimer {
    /// Record the upstream status and elapsed time
    pub fn finish(self, status_code: u16) -> Duration {
        let elapsed = self.start.elapsed();
        self.metrics.record_upstream(status_code, elapsed);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_metrics_without_recorder() {
        // No recorder installed: recording must be a harmless no-op
        let metrics = RelayMetrics::new("scan");
        assert_eq!(metrics.endpoint(), "scan");

        metrics.record_request();
        metrics.record_rejection(RejectReason::InvalidInput);
        let elapsed = metrics.start_upstream().finish(200);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_reject_reason_labels() {
        assert_eq!(RejectReason::MethodNotAllowed.as_str(), "method_not_allowed");
        assert_eq!(RejectReason::NotConfigured.as_str(), "not_configured");
        assert_eq!(RejectReason::Transport.as_str(), "transport");
    }
}
