//! TRSS HTTP transport adapter.
//!
//! Implements the [`trss::Transport`] trait over HTTP with `reqwest`: every
//! [`trss::FormRequest`] becomes a `POST` with an
//! `application/x-www-form-urlencoded` body whose first field is `action`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection pooling, timeouts, status handling and
//! error mapping all live here. The [`trss`] crate sees only
//! [`trss::Transport`] and [`trss::TransportError`].
//!
//! ## Cancellation
//!
//! A request cannot be cancelled once issued; the configured
//! [`HttpTransportConfig::timeout`] bounds how long it may take and surfaces
//! as [`trss::TransportError::Timeout`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use trss::{FormRequest, Transport, TransportError};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpTransportConfig {
    /// Upper bound on one request, connect to last body byte.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("trss-http/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// The underlying HTTP client could not be constructed.
#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct BuildError(#[from] reqwest::Error);

/// [`Transport`] implementation backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &HttpTransportConfig) -> Result<Self, BuildError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client, keeping whatever settings it was built with.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &FormRequest) -> Result<String, TransportError> {
        debug!(url = %request.url, action = request.action, "POST");
        let response = self
            .client
            .post(&request.url)
            .form(&request.form_fields())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            warn!(url = %request.url, status = status.as_u16(), "non-success status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                retry_after,
            });
        }

        response.text().await.map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(error.to_string())
    }
}

/// `Retry-After` in its delta-seconds form. HTTP-date values are ignored.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_seconds_are_parsed() {
        assert_eq!(parse_retry_after("120"), Some(Duration::from_secs(120)));
        assert_eq!(parse_retry_after(" 3 "), Some(Duration::from_secs(3)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn default_config_identifies_the_crate() {
        let config = HttpTransportConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("trss-http/"));
        assert!(HttpTransport::new(&config).is_ok());
    }
}
