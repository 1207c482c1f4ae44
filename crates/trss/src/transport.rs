//! The transport port.
//!
//! The client only knows how to build a [`FormRequest`]; delivering it is the
//! job of a [`Transport`] implementation supplied by an infrastructure crate
//! (`trss-http` for real HTTP, a recording fake in tests).

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::errors::RetryPolicy;

/// A transport-level failure. Opaque to the domain: it is propagated to the
/// caller and never interpreted as a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success HTTP status.
    #[error("server returned HTTP {status}")]
    Status {
        status: u16,
        /// Parsed `Retry-After` header, if present.
        retry_after: Option<Duration>,
    },

    /// No response arrived within the configured timeout.
    #[error("request timed out")]
    Timeout,
}

impl TransportError {
    /// Timeouts, `429` and `5xx` responses may succeed on a later attempt.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            TransportError::Timeout => RetryPolicy::Retryable { after: None },
            TransportError::Status {
                status,
                retry_after,
            } if *status == 429 || *status >= 500 => RetryPolicy::Retryable {
                after: *retry_after,
            },
            _ => RetryPolicy::NonRetryable,
        }
    }
}

/// One action call: a target URL plus the form fields to POST to it.
#[derive(Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub url: String,
    pub action: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl FormRequest {
    pub fn new(url: impl Into<String>, action: &'static str) -> Self {
        Self {
            url: url.into(),
            action,
            params: Vec::new(),
        }
    }

    /// Appends a form field.
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// The complete field list in send order: `action` always comes first.
    pub fn form_fields(&self) -> Vec<(&str, &str)> {
        std::iter::once(("action", self.action))
            .chain(self.params.iter().map(|(k, v)| (*k, v.as_str())))
            .collect()
    }

    /// Looks up a parameter value by field name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

// Field values may hold passwords and tokens.
impl std::fmt::Debug for FormRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.params.iter().map(|(k, _)| *k).collect();
        f.debug_struct("FormRequest")
            .field("url", &self.url)
            .field("action", &self.action)
            .field("params", &names)
            .finish()
    }
}

/// Delivers a [`FormRequest`] as an `application/x-www-form-urlencoded` POST
/// and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &FormRequest) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &FormRequest) -> Result<String, TransportError> {
        (**self).send(request).await
    }
}
