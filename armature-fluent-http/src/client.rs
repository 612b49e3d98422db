//! HTTP client implementation.

use std::sync::Arc;

use crate::body::BodyFormat;
use crate::options::RequestConfig;
use crate::reqwest_transport::ReqwestTransport;
use crate::transport::Transport;
use crate::{HttpClientConfig, RequestBuilder};

/// Factory for request builders that share defaults and a transport.
///
/// Every call to [`request`](Self::request) starts a fresh, independent
/// chain; nothing configured on one builder leaks into another.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: Arc<HttpClientConfig>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(config.clone()));
        Self::with_transport(config, transport)
    }

    /// Create a client that sends through a custom transport.
    pub fn with_transport(config: HttpClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Self {
        Self::new(HttpClientConfig::default())
    }

    /// Create a client configured from `ARMATURE_HTTP_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(HttpClientConfig::from_env())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Start a JSON request chain seeded with the client defaults.
    pub fn request(&self) -> RequestBuilder {
        let mut config = RequestConfig {
            body_format: BodyFormat::Json,
            ..Default::default()
        };
        if let Some(url) = &self.config.base_url {
            config.set_base_url(url);
        }
        config.settings.timeout = self.config.timeout;
        for (name, value) in &self.config.default_headers {
            config.insert_header(name, value);
        }

        RequestBuilder::from_parts(config, Arc::clone(&self.transport)).as_json()
    }

    /// Start a JSON request chain against a specific base URL.
    pub fn base_url(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.request().base_url(url)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::default_client()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::default();
        assert!(client.config().gzip);
        assert!(client.config().base_url.is_none());
    }

    #[test]
    fn test_request_seeded_from_config() {
        let config = HttpClientConfig::builder()
            .timeout(Duration::from_secs(60))
            .base_url("https://api.example.com")
            .default_header("X-Api-Version", "2")
            .build();

        let client = HttpClient::new(config);
        let builder = client.request();
        let request = builder.config();

        assert_eq!(request.base_url.as_deref(), Some("https://api.example.com/"));
        assert_eq!(request.settings.timeout, Some(Duration::from_secs(60)));
        assert_eq!(request.headers.get("x-api-version").unwrap(), "2");
        assert_eq!(request.headers.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_builders_are_independent() {
        let client = HttpClient::default();
        let first = client.base_url("https://a.test").with_token("one");
        let second = client.base_url("https://b.test");

        assert!(first.config().headers.get("authorization").is_some());
        assert!(second.config().headers.get("authorization").is_none());
        assert_eq!(second.config().base_url.as_deref(), Some("https://b.test/"));
    }
}
