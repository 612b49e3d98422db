//! Default transport built on reqwest.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::body::EncodedBody;
use crate::config::HttpClientConfig;
use crate::transport::{
    RawResponse, Transport, TransportError, TransportOutcome, TransportRequest, TransportSettings,
};

/// Transport that sends requests with [`reqwest`].
///
/// One client built from the configured defaults is shared by every send
/// whose settings match those defaults. Requests that change redirects,
/// TLS verification, proxy or cookies get a dedicated client, and a
/// caller-owned client is always used as-is. Timeouts are applied per
/// request, so they hold for every kind of client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    config: Arc<HttpClientConfig>,
    default_client: Arc<OnceCell<reqwest::Client>>,
}

impl ReqwestTransport {
    /// Create a transport with the given defaults.
    pub fn new(config: HttpClientConfig) -> Self {
        Self {
            config: Arc::new(config),
            default_client: Arc::new(OnceCell::new()),
        }
    }

    /// Get the transport defaults.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    async fn client_for(
        &self,
        settings: &TransportSettings,
    ) -> Result<reqwest::Client, TransportError> {
        if let Some(client) = &settings.client {
            if needs_dedicated_client(settings) {
                warn!(
                    follow_redirects = settings.follow_redirects,
                    verify_tls = settings.verify_tls,
                    proxy = settings.proxy.is_some(),
                    cookie_jar = settings.cookie_jar.is_some(),
                    "Client-level settings are ignored when a caller-owned client is used"
                );
            }
            return Ok(client.clone());
        }

        if needs_dedicated_client(settings) {
            return self.build_client(settings);
        }

        self.default_client
            .get_or_try_init(|| async { self.build_client(settings) })
            .await
            .cloned()
    }

    fn build_client(&self, settings: &TransportSettings) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .user_agent(&self.config.user_agent)
            .gzip(self.config.gzip)
            .brotli(self.config.brotli)
            .danger_accept_invalid_certs(!settings.verify_tls);

        builder = if settings.follow_redirects {
            builder.redirect(reqwest::redirect::Policy::limited(self.config.max_redirects))
        } else {
            builder.redirect(reqwest::redirect::Policy::none())
        };

        if let Some(proxy) = &settings.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| TransportError::Build(e.to_string()))?;
            builder = builder.proxy(proxy);
        }
        if let Some(jar) = &settings.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))
    }

    async fn send_once(
        &self,
        client: &reqwest::Client,
        request: &TransportRequest,
    ) -> Result<RawResponse, TransportError> {
        let mut builder = client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(timeout) = request.settings.timeout.or(self.config.timeout) {
            builder = builder.timeout(timeout);
        }

        builder = match &request.body {
            EncodedBody::Empty => builder,
            EncodedBody::Json(value) => builder.json(value),
            EncodedBody::Form(fields) => builder.form(fields),
            EncodedBody::Multipart(parts) => {
                // Forms are consumed on send, so they are rebuilt per attempt.
                let form = parts
                    .iter()
                    .fold(reqwest::multipart::Form::new(), |form, (key, value)| {
                        form.text(key.clone(), value.clone())
                    });
                builder.multipart(form)
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(error = %e, "Failed to read response body");
                None
            }
        };

        Ok(RawResponse::new(status, headers, body))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> TransportOutcome {
        let client = match self.client_for(&request.settings).await {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Failed to build HTTP client");
                return TransportOutcome::Failure(e);
            }
        };

        let retry = request
            .settings
            .retry
            .filter(|policy| policy.retries_method(&request.method));
        let mut retries = 0;

        loop {
            let result = self.send_once(&client, &request).await;

            let Some(policy) = retry.filter(|p| p.allows(retries)) else {
                return finish(result);
            };

            let delay = match &result {
                Ok(response) if policy.should_retry_status(response.status) => {
                    debug!(
                        attempt = retries + 1,
                        status = response.status,
                        "Retrying request due to status code"
                    );
                    policy.delay_for(retries + 1, Some(response.status), Some(&response.headers))
                }
                Err(e) if e.is_retryable() => {
                    debug!(attempt = retries + 1, error = %e, "Retrying request due to error");
                    policy.delay_for(retries + 1, None, None)
                }
                _ => return finish(result),
            };

            retries += 1;
            tokio::time::sleep(delay).await;
        }
    }
}

/// Settings that reqwest only honors at client level.
fn needs_dedicated_client(settings: &TransportSettings) -> bool {
    !settings.follow_redirects
        || !settings.verify_tls
        || settings.proxy.is_some()
        || settings.cookie_jar.is_some()
}

fn finish(result: Result<RawResponse, TransportError>) -> TransportOutcome {
    match result {
        Ok(response) => TransportOutcome::from_response(response),
        Err(e) => {
            warn!(error = %e, "HTTP transport failure");
            TransportOutcome::Failure(e)
        }
    }
}
