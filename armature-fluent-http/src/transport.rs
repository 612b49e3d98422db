//! Transport collaborator boundary.
//!
//! The request builder never performs network I/O itself. It hands a fully
//! assembled [`TransportRequest`] to a [`Transport`] and receives a tagged
//! [`TransportOutcome`], so an HTTP error status is an ordinary value rather
//! than something to intercept.

use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::body::EncodedBody;
use crate::retry::RetryPolicy;

/// Sends one request and reports what happened.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the exchange, including any retries the request asks for.
    async fn send(&self, request: TransportRequest) -> TransportOutcome;
}

/// A request ready for the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully resolved URL, query included.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Encoded body.
    pub body: EncodedBody,
    /// Per-request transport settings.
    pub settings: TransportSettings,
}

/// Transport-level settings carried opaquely from the builder.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Follow redirects.
    pub follow_redirects: bool,
    /// Verify TLS certificates.
    pub verify_tls: bool,
    /// Overall request timeout.
    pub timeout: Option<Duration>,
    /// Retry policy.
    pub retry: Option<RetryPolicy>,
    /// Proxy URL for all schemes.
    pub proxy: Option<String>,
    /// Cookie jar shared with the caller.
    pub cookie_jar: Option<std::sync::Arc<reqwest::cookie::Jar>>,
    /// Caller-owned client used instead of a per-request one.
    pub client: Option<reqwest::Client>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            verify_tls: true,
            timeout: None,
            retry: None,
            proxy: None,
            cookie_jar: None,
            client: None,
        }
    }
}

/// What the transport received from the server.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body text, absent when reading it failed.
    pub body: Option<String>,
}

impl RawResponse {
    /// Create a raw response.
    pub fn new(status: u16, headers: HeaderMap, body: Option<String>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

/// Result of one transport exchange.
#[derive(Debug)]
pub enum TransportOutcome {
    /// The server answered with a non-error status.
    Ok(RawResponse),
    /// The server answered with a 4xx or 5xx status.
    HttpError(RawResponse),
    /// No response was received.
    Failure(TransportError),
}

impl TransportOutcome {
    /// Tag a raw response by its status.
    pub fn from_response(response: RawResponse) -> Self {
        if response.status >= 400 {
            Self::HttpError(response)
        } else {
            Self::Ok(response)
        }
    }

    /// Check if a response was received, whatever its status.
    pub fn has_response(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }
}

/// Network-level failure with no HTTP response.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connect(String),

    /// The underlying client or request could not be built.
    #[error("Failed to build request: {0}")]
    Build(String),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Check if this failure is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connect(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_builder() {
            Self::Build(e.to_string())
        } else {
            Self::Other(e.to_string())
        }
    }
}
