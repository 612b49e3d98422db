//! Fluent request builder.

use base64::Engine;
use http::{Method, header};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::body::{BodyFormat, EncodedBody, Payload};
use crate::options::{RequestConfig, RequestOptions};
use crate::reqwest_transport::ReqwestTransport;
use crate::retry::RetryPolicy;
use crate::transport::{Transport, TransportOutcome, TransportRequest};
use crate::{FluentHttpError, Response, Result};

/// Where a verb puts its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadRole {
    Query,
    Body,
}

impl PayloadRole {
    fn for_method(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD {
            Self::Query
        } else {
            Self::Body
        }
    }
}

/// Fluent HTTP request builder.
///
/// Configuration calls consume and return the builder. A verb call
/// snapshots the configuration, dispatches through the transport and
/// always yields a [`Response`], whatever the status code. The only
/// errors a verb returns are configuration errors found before sending.
///
/// ```rust,no_run
/// use armature_fluent_http::RequestBuilder;
/// use serde_json::json;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let response = RequestBuilder::new("https://api.example.com")
///     .with_token("secret")
///     .post_with("/orders", &json!({"item": "widget", "quantity": 5}))
///     .await?
///     .throw()?;
///
/// println!("{}", response.json()?["id"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestBuilder {
    config: RequestConfig,
    transport: Arc<dyn Transport>,
}

impl RequestBuilder {
    /// Create a JSON request builder for the given base URL.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::default().base_url(base_url)
    }

    /// Create a builder from existing configuration and transport.
    pub fn from_parts(config: RequestConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Set the base URL that relative paths resolve against.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self {
        self.config.set_base_url(url.as_ref());
        self
    }

    /// Send payloads as JSON.
    pub fn as_json(self) -> Self {
        self.body_format(BodyFormat::Json)
            .content_type("application/json")
    }

    /// Send payloads as URL-encoded form fields.
    pub fn as_form(self) -> Self {
        self.body_format(BodyFormat::Form)
            .content_type("application/x-www-form-urlencoded")
    }

    /// Send payloads as multipart form data.
    ///
    /// Any `Content-Type` set so far is dropped; the transport sets it with
    /// the multipart boundary.
    pub fn as_multipart(mut self) -> Self {
        self.config.headers.remove(header::CONTENT_TYPE);
        self.body_format(BodyFormat::Multipart)
    }

    /// Set the body format without touching headers.
    pub fn body_format(mut self, format: BodyFormat) -> Self {
        self.config.body_format = format;
        self
    }

    /// Set the request's content type.
    pub fn content_type(self, content_type: &str) -> Self {
        self.with_header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Ask the server for JSON.
    pub fn accept_json(self) -> Self {
        self.accept("application/json")
    }

    /// Set the content type expected back from the server.
    pub fn accept(self, content_type: &str) -> Self {
        self.with_header(header::ACCEPT.as_str(), content_type)
    }

    /// Add a single header, replacing any value with the same name.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl fmt::Display) -> Self {
        self.config
            .insert_header(name.as_ref(), &value.to_string());
        self
    }

    /// Merge headers into the request; later values win for the same name.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        for (name, value) in headers {
            self.config
                .insert_header(name.as_ref(), &value.to_string());
        }
        self
    }

    /// Set basic authentication.
    pub fn with_basic_auth(self, username: &str, password: &str) -> Self {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", username, password));
        self.with_header(header::AUTHORIZATION.as_str(), format!("Basic {}", encoded))
    }

    /// Digest authentication is not supported and always fails.
    pub fn with_digest_auth(self, username: &str, password: &str) -> Result<Self> {
        Err(FluentHttpError::NotImplemented(format!(
            "The [with_digest_auth(\"{}\", \"{}\")] method is not yet supported.",
            username, password
        )))
    }

    /// Set bearer authentication.
    pub fn with_token(self, token: &str) -> Self {
        self.with_header(header::AUTHORIZATION.as_str(), format!("Bearer {}", token))
    }

    /// Do not follow redirects.
    pub fn without_redirecting(mut self) -> Self {
        self.config.settings.follow_redirects = false;
        self
    }

    /// Do not verify TLS certificates.
    pub fn without_verifying(mut self) -> Self {
        self.config.settings.verify_tls = false;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.settings.timeout = Some(timeout);
        self
    }

    /// Retry up to `times` times, with each delay capped at `max_delay`.
    pub fn retry(mut self, times: u32, max_delay: Option<Duration>) -> Self {
        self.config.settings.retry = Some(RetryPolicy::new(times, max_delay));
        self
    }

    /// Route the request through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.settings.proxy = Some(proxy.into());
        self
    }

    /// Share a cookie jar with the transport.
    pub fn with_cookie_jar(mut self, jar: Arc<reqwest::cookie::Jar>) -> Self {
        self.config.settings.cookie_jar = Some(jar);
        self
    }

    /// Send with a caller-owned reqwest client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.config.settings.client = Some(client);
        self
    }

    /// Merge arbitrary options over the current configuration.
    ///
    /// Applied once, in call order: setters called later override these
    /// options, setters called earlier are overridden by them.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.config.merge(options);
        self
    }

    /// Swap the transport used for this chain.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Issue a GET request.
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.send(Method::GET, path, None).await
    }

    /// Issue a GET request with query parameters.
    pub async fn get_with<T: Serialize + ?Sized>(&self, path: &str, query: &T) -> Result<Response> {
        self.send(Method::GET, path, Some(Payload::new(query)?)).await
    }

    /// Issue a HEAD request.
    pub async fn head(&self, path: &str) -> Result<Response> {
        self.send(Method::HEAD, path, None).await
    }

    /// Issue a HEAD request with query parameters.
    pub async fn head_with<T: Serialize + ?Sized>(&self, path: &str, query: &T) -> Result<Response> {
        self.send(Method::HEAD, path, Some(Payload::new(query)?)).await
    }

    /// Issue a POST request.
    pub async fn post(&self, path: &str) -> Result<Response> {
        self.send(Method::POST, path, None).await
    }

    /// Issue a POST request with a body.
    pub async fn post_with<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<Response> {
        self.send(Method::POST, path, Some(Payload::new(data)?)).await
    }

    /// Issue a PUT request.
    pub async fn put(&self, path: &str) -> Result<Response> {
        self.send(Method::PUT, path, None).await
    }

    /// Issue a PUT request with a body.
    pub async fn put_with<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<Response> {
        self.send(Method::PUT, path, Some(Payload::new(data)?)).await
    }

    /// Issue a PATCH request.
    pub async fn patch(&self, path: &str) -> Result<Response> {
        self.send(Method::PATCH, path, None).await
    }

    /// Issue a PATCH request with a body.
    pub async fn patch_with<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<Response> {
        self.send(Method::PATCH, path, Some(Payload::new(data)?)).await
    }

    /// Issue a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.send(Method::DELETE, path, None).await
    }

    /// Issue a DELETE request with a body.
    pub async fn delete_with<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<Response> {
        self.send(Method::DELETE, path, Some(Payload::new(data)?)).await
    }

    /// Assemble the request a verb would send, without sending it.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> Result<TransportRequest> {
        let config = self.config.clone();
        let mut url = resolve_url(config.base_url.as_deref(), path)?;
        let mut body = EncodedBody::Empty;

        if let Some(payload) = payload {
            match PayloadRole::for_method(&method) {
                PayloadRole::Query => {
                    let entries = payload.entries()?;
                    if !entries.is_empty() {
                        url.query_pairs_mut().extend_pairs(entries);
                    }
                }
                PayloadRole::Body => {
                    body = EncodedBody::encode(config.body_format, payload)?;
                }
            }
        }

        Ok(TransportRequest {
            method,
            url,
            headers: config.headers,
            body,
            settings: config.settings,
        })
    }

    async fn send(&self, method: Method, path: &str, payload: Option<Payload>) -> Result<Response> {
        let request = self.build_request(method, path, payload.as_ref())?;
        debug!(method = %request.method, url = %request.url, "Sending HTTP request");

        let response = match self.transport.send(request).await {
            TransportOutcome::Ok(raw) | TransportOutcome::HttpError(raw) => Response::from_raw(raw),
            TransportOutcome::Failure(e) => Response::from_transport_error(e),
        };

        debug!(status = response.status(), "Received HTTP response");
        Ok(response)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::from_parts(RequestConfig::default(), Arc::new(ReqwestTransport::default())).as_json()
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Leading separators are stripped so a path cannot escape the base path.
fn resolve_url(base_url: Option<&str>, path: &str) -> Result<Url> {
    let path = path.trim_start_matches('/');
    let target = match base_url {
        Some(base) => format!("{}{}", base, path),
        None => path.to_string(),
    };

    Url::parse(&target).map_err(|e| FluentHttpError::InvalidUrl(format!("{}: {}", target, e)))
}
