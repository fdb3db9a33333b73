use crate::*;
use tracing::{debug, info, instrument};

impl RelayConfig {
    /// Build a configuration from an arbitrary variable lookup
    ///
    /// Empty values count as unset. Malformed numeric or scheme values are
    /// rejected; absent upstream credentials are not.
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(&lookup, vars::PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                var: vars::PORT.to_string(),
                value: raw.clone(),
            })?,
            None => defaults::default_port(),
        };

        let scheme = match non_empty(&lookup, vars::BBUDDY_SCHEME) {
            Some(raw) => UpstreamScheme::parse(&raw).ok_or_else(|| ConfigError::InvalidScheme {
                var: vars::BBUDDY_SCHEME.to_string(),
                value: raw.clone(),
            })?,
            None => UpstreamScheme::default(),
        };

        let timeout_secs = match non_empty(&lookup, vars::BBUDDY_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidInteger {
                var: vars::BBUDDY_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?,
            None => defaults::default_timeout_secs(),
        };

        Ok(Self {
            listen: ListenConfig {
                host: defaults::default_bind_host(),
                port,
            },
            upstream: UpstreamConfig {
                host: non_empty(&lookup, vars::BBUDDY_HOST),
                api_key: non_empty(&lookup, vars::BBUDDY_API_KEY),
                scheme,
                timeout_secs,
            },
        })
    }

    /// Replace the listen port (CLI override)
    pub fn with_port(mut self, port: u16) -> Self {
        self.listen.port = port;
        self
    }

    /// Replace the bind host (CLI override)
    pub fn with_bind_host(mut self, host: impl Into<String>) -> Self {
        self.listen.host = host.into();
        self
    }
}

/// Load the relay configuration from the process environment
#[instrument]
pub fn load_config() -> anyhow::Result<RelayConfig> {
    info!("Loading configuration from environment");

    let config = RelayConfig::from_lookup(process_env)?;
    debug!(?config, "Configuration loaded");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = RelayConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.listen.port, 8080);
        assert_eq!(config.listen.host, "0.0.0.0");
        assert_eq!(config.upstream.host, None);
        assert_eq!(config.upstream.api_key, None);
        assert_eq!(config.upstream.scheme, UpstreamScheme::Https);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(config.upstream.target().is_none());
    }

    #[test]
    fn test_full_environment() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("PORT", "9090"),
            ("BBUDDY_HOST", "bbuddy.example.com"),
            ("BBUDDY_API_KEY", "secret"),
            ("BBUDDY_SCHEME", "http"),
            ("BBUDDY_TIMEOUT_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.listen.port, 9090);
        assert_eq!(config.upstream.timeout(), None);
        let target = config.upstream.target().unwrap();
        assert_eq!(target.base_url, "http://bbuddy.example.com");
        assert_eq!(target.api_key, "secret");
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("PORT", ""),
            ("BBUDDY_HOST", ""),
            ("BBUDDY_API_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.listen.port, 8080);
        assert_eq!(config.upstream.host, None);
        assert!(config.upstream.target().is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = RelayConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));

        let err = RelayConfig::from_lookup(lookup_from(&[("PORT", "70000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));

        let err =
            RelayConfig::from_lookup(lookup_from(&[("BBUDDY_TIMEOUT_SECS", "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInteger { .. }));

        let err = RelayConfig::from_lookup(lookup_from(&[("BBUDDY_SCHEME", "ftp")])).unwrap_err();
        assert_eq!(err.to_string(), "BBUDDY_SCHEME must be one of: https, http, got: \"ftp\"");
    }

    #[test]
    fn test_overrides() {
        let config = RelayConfig::default()
            .with_port(3000)
            .with_bind_host("127.0.0.1");
        assert_eq!(config.listen.port, 3000);
        assert_eq!(config.listen.host, "127.0.0.1");
    }
}
