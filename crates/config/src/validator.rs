use crate::*;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Upstream host '{host}': {message}")]
    InvalidUpstreamHost { host: String, message: String },

    #[error("Upstream API key: {message}")]
    InvalidApiKey { message: String },

    #[error("Listen host '{host}' is not a valid bind address")]
    InvalidBindHost { host: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

fn host_regex() -> &'static Regex {
    static HOST: OnceLock<Regex> = OnceLock::new();
    HOST.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?|\[[0-9A-Fa-f:.]+\])(?::\d{1,5})?$")
            .expect("host pattern is valid")
    })
}

pub fn validate_config(config: &RelayConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_listen(&config.listen, &mut report);
    validate_upstream(&config.upstream, &mut report);

    report
}

fn validate_listen(listen: &ListenConfig, report: &mut ValidationReport) {
    if listen.host.parse::<std::net::IpAddr>().is_err() {
        report.add_error(ValidationError::InvalidBindHost {
            host: listen.host.clone(),
        });
    }

    if listen.port == 0 {
        report.add_warning(
            "listen.port",
            "Port 0 binds an ephemeral port chosen by the operating system",
        );
    }
}

fn validate_upstream(upstream: &UpstreamConfig, report: &mut ValidationReport) {
    match upstream.host.as_deref() {
        None => report.add_warning(
            vars::BBUDDY_HOST,
            "Not set; forwarding endpoints will answer 500 until it is configured",
        ),
        Some(host) if host.contains("://") => {
            report.add_error(ValidationError::InvalidUpstreamHost {
                host: host.to_string(),
                message: format!("must not include a scheme, use {} instead", vars::BBUDDY_SCHEME),
            })
        }
        Some(host) if host.chars().any(char::is_whitespace) => {
            report.add_error(ValidationError::InvalidUpstreamHost {
                host: host.to_string(),
                message: "must not contain whitespace".to_string(),
            })
        }
        Some(host) => {
            let (authority, prefix) = match host.split_once('/') {
                Some((authority, prefix)) => (authority, Some(prefix)),
                None => (host, None),
            };

            if !host_regex().is_match(authority) {
                report.add_error(ValidationError::InvalidUpstreamHost {
                    host: host.to_string(),
                    message: "is not a valid host name".to_string(),
                });
            } else if let Some(prefix) = prefix.filter(|p| !p.trim_matches('/').is_empty()) {
                report.add_warning(
                    vars::BBUDDY_HOST,
                    &format!(
                        "Includes path prefix '/{}'; upstream calls go to {}/api/...",
                        prefix.trim_matches('/'),
                        host.trim_end_matches('/')
                    ),
                );
            }
        }
    }

    match upstream.api_key.as_deref() {
        None => report.add_warning(
            vars::BBUDDY_API_KEY,
            "Not set; forwarding endpoints will answer 500 until it is configured",
        ),
        Some(key) if !key.chars().all(|c| c == '\t' || (' '..='~').contains(&c)) => {
            report.add_error(ValidationError::InvalidApiKey {
                message: "contains characters that cannot be sent in an HTTP header".to_string(),
            })
        }
        Some(key) if key.trim() != key => report.add_warning(
            vars::BBUDDY_API_KEY,
            "Has leading or trailing whitespace, which is sent verbatim",
        ),
        Some(_) => {}
    }

    if upstream.scheme == UpstreamScheme::Http {
        report.add_warning(
            vars::BBUDDY_SCHEME,
            "Plain http sends the API key unencrypted",
        );
    }

    if upstream.timeout_secs == 0 {
        report.add_warning(
            vars::BBUDDY_TIMEOUT_SECS,
            "Timeout disabled; a stalled upstream holds requests open indefinitely",
        );
    }
}
