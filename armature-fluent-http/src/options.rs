//! Accumulated request configuration.

use http::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::body::BodyFormat;
use crate::retry::RetryPolicy;
use crate::transport::TransportSettings;

/// Configuration owned by one [`RequestBuilder`](crate::RequestBuilder).
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Base URL, always ending with a single `/` when set.
    pub base_url: Option<String>,
    /// Encoding of outgoing payloads.
    pub body_format: BodyFormat,
    /// Request headers.
    pub headers: HeaderMap,
    /// Transport settings.
    pub settings: TransportSettings,
}

impl RequestConfig {
    /// Store a base URL with exactly one trailing separator.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = Some(ensure_trailing_slash(url));
    }

    /// Insert one header, replacing any value with the same name.
    ///
    /// Invalid names or values are skipped.
    pub fn insert_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!(header = name, "Skipping invalid header"),
        }
    }

    /// Right-biased merge of transport options.
    pub fn merge(&mut self, options: RequestOptions) {
        if let Some(url) = options.base_url {
            self.set_base_url(&url);
        }
        if let Some(headers) = options.headers {
            self.headers = headers;
        }
        if let Some(follow) = options.follow_redirects {
            self.settings.follow_redirects = follow;
        }
        if let Some(verify) = options.verify_tls {
            self.settings.verify_tls = verify;
        }
        if let Some(timeout) = options.timeout {
            self.settings.timeout = Some(timeout);
        }
        if let Some(retry) = options.retry {
            self.settings.retry = Some(retry);
        }
        if let Some(proxy) = options.proxy {
            self.settings.proxy = Some(proxy);
        }
        if let Some(jar) = options.cookie_jar {
            self.settings.cookie_jar = Some(jar);
        }
        if let Some(client) = options.client {
            self.settings.client = Some(client);
        }
    }
}

/// Arbitrary transport options merged with
/// [`RequestBuilder::with_options`](crate::RequestBuilder::with_options).
///
/// Every field that is set replaces the current value wholesale, headers
/// included. Setters called afterwards win; setters called before are
/// overwritten.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Base URL.
    pub base_url: Option<String>,
    /// Complete replacement header set.
    pub headers: Option<HeaderMap>,
    /// Follow redirects.
    pub follow_redirects: Option<bool>,
    /// Verify TLS certificates.
    pub verify_tls: Option<bool>,
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Retry policy.
    pub retry: Option<RetryPolicy>,
    /// Proxy URL.
    pub proxy: Option<String>,
    /// Cookie jar.
    pub cookie_jar: Option<Arc<reqwest::cookie::Jar>>,
    /// Caller-owned client.
    pub client: Option<reqwest::Client>,
}

impl RequestOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Replace the header set.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Enable or disable following redirects.
    pub fn follow_redirects(mut self, enable: bool) -> Self {
        self.follow_redirects = Some(enable);
        self
    }

    /// Enable or disable TLS verification.
    pub fn verify_tls(mut self, enable: bool) -> Self {
        self.verify_tls = Some(enable);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Set the proxy URL.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the cookie jar.
    pub fn cookie_jar(mut self, jar: Arc<reqwest::cookie::Jar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Use a caller-owned client.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }
}

pub(crate) fn ensure_trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_normalization() {
        assert_eq!(ensure_trailing_slash("https://a.test"), "https://a.test/");
        assert_eq!(ensure_trailing_slash("https://a.test/"), "https://a.test/");
        assert_eq!(ensure_trailing_slash("https://a.test/v1//"), "https://a.test/v1/");
    }

    #[test]
    fn test_insert_header_replaces_case_insensitively() {
        let mut config = RequestConfig::default();
        config.insert_header("X-Token", "one");
        config.insert_header("x-token", "two");

        assert_eq!(config.headers.len(), 1);
        assert_eq!(config.headers.get("X-Token").unwrap(), "two");
    }

    #[test]
    fn test_insert_header_skips_invalid() {
        let mut config = RequestConfig::default();
        config.insert_header("bad header", "value");
        config.insert_header("X-Ok", "line\nbreak");

        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_merge_is_right_biased() {
        let mut config = RequestConfig::default();
        config.insert_header("Accept", "text/plain");
        config.settings.timeout = Some(Duration::from_secs(5));

        config.merge(
            RequestOptions::new()
                .verify_tls(false)
                .retry(RetryPolicy::new(2, None))
                .headers(HeaderMap::new()),
        );

        assert!(!config.settings.verify_tls);
        assert!(config.settings.follow_redirects);
        assert_eq!(config.settings.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.settings.retry, Some(RetryPolicy::new(2, None)));
        assert!(config.headers.is_empty());
    }
}
