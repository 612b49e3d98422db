//! HTTP client configuration.

use std::env;
use std::time::Duration;

const ENV_BASE_URL: &str = "ARMATURE_HTTP_BASE_URL";
const ENV_TIMEOUT: &str = "ARMATURE_HTTP_TIMEOUT";
const ENV_CONNECT_TIMEOUT: &str = "ARMATURE_HTTP_CONNECT_TIMEOUT";
const ENV_USER_AGENT: &str = "ARMATURE_HTTP_USER_AGENT";

/// Defaults applied by [`HttpClient`](crate::HttpClient) and the reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL seeded into every request builder.
    pub base_url: Option<String>,
    /// Default request timeout.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Default headers for all requests.
    pub default_headers: Vec<(String, String)>,
    /// User agent string.
    pub user_agent: String,
    /// Enable gzip decompression.
    pub gzip: bool,
    /// Enable brotli decompression.
    pub brotli: bool,
    /// Maximum redirects to follow.
    pub max_redirects: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            default_headers: Vec::new(),
            user_agent: format!("armature-fluent-http/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
            brotli: true,
            max_redirects: 10,
        }
    }
}

impl HttpClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Load the defaults, overridden by `ARMATURE_HTTP_*` environment variables.
    ///
    /// Timeouts are whole seconds; values that do not parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the defaults, overridden by whatever `lookup` returns for the
    /// `ARMATURE_HTTP_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = Some(url);
        }
        if let Some(timeout) = secs(ENV_TIMEOUT) {
            config.timeout = Some(timeout);
        }
        if let Some(timeout) = secs(ENV_CONNECT_TIMEOUT) {
            config.connect_timeout = timeout;
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = agent;
        }

        config
    }
}

/// Builder for HTTP client configuration.
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL for all requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header for all requests.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((name.into(), value.into()));
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable gzip decompression.
    pub fn gzip(mut self, enable: bool) -> Self {
        self.config.gzip = enable;
        self
    }

    /// Enable or disable brotli decompression.
    pub fn brotli(mut self, enable: bool) -> Self {
        self.config.brotli = enable;
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = HttpClientConfig::default();

        assert!(config.base_url.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("armature-fluent-http/"));
    }

    #[test]
    fn test_builder() {
        let config = HttpClientConfig::builder()
            .base_url("https://api.example.com")
            .timeout(Duration::from_secs(30))
            .default_header("X-Api-Version", "2")
            .gzip(false)
            .build();

        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            config.default_headers,
            vec![("X-Api-Version".to_string(), "2".to_string())]
        );
        assert!(!config.gzip);
        assert!(config.brotli);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ARMATURE_HTTP_BASE_URL", "https://api.example.com"),
            ("ARMATURE_HTTP_TIMEOUT", " 30 "),
            ("ARMATURE_HTTP_CONNECT_TIMEOUT", "3"),
            ("ARMATURE_HTTP_USER_AGENT", "billing-service/1.0"),
        ]);
        let config = HttpClientConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "billing-service/1.0");
    }

    #[test]
    fn test_from_lookup_keeps_defaults_for_bad_numbers() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ARMATURE_HTTP_TIMEOUT", "soon"),
            ("ARMATURE_HTTP_CONNECT_TIMEOUT", "-1"),
        ]);
        let config = HttpClientConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert!(config.base_url.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("armature-fluent-http/"));
    }

    #[test]
    fn test_from_lookup_empty() {
        let config = HttpClientConfig::from_lookup(|_| None);
        assert!(config.base_url.is_none());
        assert_eq!(config.max_redirects, 10);
    }
}
