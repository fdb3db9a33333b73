//! Configuration for the Barcode Buddy relay
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file). They are read once at startup into a [`RelayConfig`] which
//! is then handed to the relay explicitly; handlers never consult the
//! environment themselves.
//!
//! Missing upstream credentials are not a load error. The relay still starts
//! and answers every forwarding request with a configuration error, which
//! [`validate_config`] reports as a warning.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub mod defaults;
pub mod env;
pub mod parser;
pub mod validator;

pub use env::*;
pub use parser::*;
pub use validator::*;

/// Environment variable names
pub mod vars {
    /// Listen port
    pub const PORT: &str = "PORT";
    /// Upstream host, optionally with `:port`
    pub const BBUDDY_HOST: &str = "BBUDDY_HOST";
    /// Shared secret sent in the `BBUDDY-API-KEY` header
    pub const BBUDDY_API_KEY: &str = "BBUDDY_API_KEY";
    /// Upstream scheme (`https` or `http`)
    pub const BBUDDY_SCHEME: &str = "BBUDDY_SCHEME";
    /// Total upstream request timeout in seconds, `0` disables it
    pub const BBUDDY_TIMEOUT_SECS: &str = "BBUDDY_TIMEOUT_SECS";
}

/// Errors raised while reading configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a valid port number, got: {value:?}")]
    InvalidPort { var: String, value: String },

    #[error("{var} must be a non-negative integer, got: {value:?}")]
    InvalidInteger { var: String, value: String },

    #[error("{var} must be one of: https, http, got: {value:?}")]
    InvalidScheme { var: String, value: String },
}

/// Scheme used to reach the upstream API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamScheme {
    #[default]
    Https,
    Http,
}

impl UpstreamScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamScheme::Https => "https",
            UpstreamScheme::Http => "http",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "https" => Some(Self::Https),
            "http" => Some(Self::Http),
            _ => None,
        }
    }
}

impl fmt::Display for UpstreamScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the relay listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// HTTP port
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: defaults::default_bind_host(),
            port: defaults::default_port(),
        }
    }
}

/// Upstream Barcode Buddy API settings
///
/// `host` and `api_key` stay optional so a half-configured relay can still
/// boot and report the problem per request.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub host: Option<String>,
    pub api_key: Option<String>,
    pub scheme: UpstreamScheme,
    /// Total request timeout in seconds; `0` means no timeout
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Fully configured upstream pointing at `host`
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: UpstreamScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Base URL and secret, if both host and secret are present
    pub fn target(&self) -> Option<UpstreamTarget> {
        match (self.host.as_deref(), self.api_key.as_deref()) {
            (Some(host), Some(api_key)) if !host.is_empty() && !api_key.is_empty() => {
                Some(UpstreamTarget {
                    base_url: format!("{}://{}", self.scheme, host.trim_end_matches('/')),
                    api_key: api_key.to_string(),
                })
            }
            _ => None,
        }
    }

    /// Request timeout, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_key: None,
            scheme: UpstreamScheme::default(),
            timeout_secs: defaults::default_timeout_secs(),
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("host", &self.host)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("scheme", &self.scheme)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// A resolved upstream: base URL (`scheme://host`) and shared secret
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub base_url: String,
    pub api_key: String,
}

impl UpstreamTarget {
    /// Absolute URL for an upstream path such as `/api/action/scan`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Debug for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamTarget")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Complete relay configuration, built once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayConfig {
    pub listen: ListenConfig,
    pub upstream: UpstreamConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_requires_host_and_key() {
        let mut upstream = UpstreamConfig::default();
        assert!(upstream.target().is_none());

        upstream.host = Some("bbuddy.local".to_string());
        assert!(upstream.target().is_none());

        upstream.api_key = Some(String::new());
        assert!(upstream.target().is_none());

        upstream.api_key = Some("secret".to_string());
        let target = upstream.target().unwrap();
        assert_eq!(target.base_url, "https://bbuddy.local");
        assert_eq!(target.api_key, "secret");
        assert_eq!(target.url("/api/action/scan"), "https://bbuddy.local/api/action/scan");
    }

    #[test]
    fn test_target_honours_scheme() {
        let upstream = UpstreamConfig::new("127.0.0.1:9000", "k").with_scheme(UpstreamScheme::Http);
        assert_eq!(upstream.target().unwrap().base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_target_keeps_host_path_prefix() {
        let target = UpstreamConfig::new("bbuddy.local/sub/", "k").target().unwrap();
        assert_eq!(target.url("/api/action/scan"), "https://bbuddy.local/sub/api/action/scan");
    }

    #[test]
    fn test_timeout_zero_disables() {
        let upstream = UpstreamConfig::new("h", "k");
        assert_eq!(upstream.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(upstream.with_timeout_secs(0).timeout(), None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let upstream = UpstreamConfig::new("bbuddy.local", "super-secret");
        let rendered = format!("{:?}", upstream);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("super-secret"));

        let rendered = format!("{:?}", upstream.target().unwrap());
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!(UpstreamScheme::parse("HTTPS"), Some(UpstreamScheme::Https));
        assert_eq!(UpstreamScheme::parse("http"), Some(UpstreamScheme::Http));
        assert_eq!(UpstreamScheme::parse("ftp"), None);
    }
}
