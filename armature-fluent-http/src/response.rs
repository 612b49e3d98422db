//! HTTP response wrapper.

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RequestException;
use crate::transport::{RawResponse, TransportError};
use crate::Result;

/// Immutable result of one request attempt.
///
/// A response exists whether the server answered with an error status or
/// the transport failed outright. Nothing is raised until [`throw`](Self::throw)
/// is called.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Option<String>,
    transport_error: Option<TransportError>,
}

impl Response {
    /// Create a response from what the transport received.
    pub fn from_raw(raw: RawResponse) -> Self {
        Self {
            status: raw.status,
            headers: raw.headers,
            body: raw.body,
            transport_error: None,
        }
    }

    /// Create a response for a request that never got an answer.
    ///
    /// The status is `0` and there are no headers or body.
    pub fn from_transport_error(error: TransportError) -> Self {
        Self {
            status: 0,
            headers: HeaderMap::new(),
            body: None,
            transport_error: Some(error),
        }
    }

    /// Get the response body as text, empty when absent.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// Get the response body, `None` when it could not be read.
    pub fn raw_body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Parse the response body as JSON.
    ///
    /// The body is parsed again on every call.
    pub fn json(&self) -> Result<Value> {
        self.json_as()
    }

    /// Deserialize the response body as JSON into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(self.body())?)
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the status code, `0` if no response was received.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the status code as a typed value.
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status).ok()
    }

    /// Get the transport failure, if the request never got an answer.
    pub fn transport_error(&self) -> Option<&TransportError> {
        self.transport_error.as_ref()
    }

    /// Check if the response was successful (2xx).
    pub fn successful(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the status is exactly 200.
    pub fn ok(&self) -> bool {
        self.status == 200
    }

    /// Check if the response was a redirect (3xx).
    pub fn redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Check if the response was a client error (4xx).
    pub fn client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response was a server error (5xx and above).
    pub fn server_error(&self) -> bool {
        self.status >= 500
    }

    /// Check if the response was a client or server error.
    pub fn failed(&self) -> bool {
        self.client_error() || self.server_error()
    }

    /// Raise a [`RequestException`] for a failed response or a transport
    /// failure, otherwise hand the response back unchanged.
    pub fn throw(self) -> std::result::Result<Self, RequestException> {
        if self.failed() || self.transport_error.is_some() {
            Err(RequestException::new(self))
        } else {
            Ok(self)
        }
    }

    /// Alias for [`throw`](Self::throw).
    pub fn raise(self) -> std::result::Result<Self, RequestException> {
        self.throw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde::Deserialize;
    use serde_json::json;

    fn response(status: u16, body: Option<&str>) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Response::from_raw(RawResponse::new(status, headers, body.map(String::from)))
    }

    #[test]
    fn test_not_found_with_empty_body() {
        let response = response(404, Some(""));

        assert_eq!(response.body(), "");
        assert_eq!(response.status(), 404);
        assert!(response.failed());
        assert!(response.client_error());
        assert!(!response.server_error());
        assert!(response.json().unwrap_err().is_parse());

        let exception = response.throw().unwrap_err();
        assert_eq!(exception.response().status(), 404);
    }

    #[test]
    fn test_ok_json_body() {
        let response = response(200, Some(r#"{"key":"value"}"#));

        assert_eq!(response.json().unwrap(), json!({"key": "value"}));
        assert!(response.ok());
        assert!(response.successful());

        let response = response.throw().unwrap();
        assert_eq!(response.body(), r#"{"key":"value"}"#);
    }

    #[test]
    fn test_json_is_reparsed_each_call() {
        let response = response(200, Some(r#"{"a":[1,2,{"b":null}]}"#));

        let first = response.json().unwrap();
        let second = response.json().unwrap();
        assert_eq!(first, second);
        assert_eq!(response.body(), r#"{"a":[1,2,{"b":null}]}"#);
    }

    #[test]
    fn test_json_as_typed() {
        #[derive(Deserialize)]
        struct Echo {
            key: String,
        }

        let response = response(200, Some(r#"{"key":"value"}"#));
        let echo: Echo = response.json_as().unwrap();
        assert_eq!(echo.key, "value");
    }

    #[test]
    fn test_absent_body() {
        let response = response(200, None);

        assert_eq!(response.body(), "");
        assert!(response.raw_body().is_none());
        assert!(response.json().is_err());
    }

    #[test]
    fn test_status_classification() {
        let cases = [
            (200, true, true, false, false, false),
            (204, true, false, false, false, false),
            (301, false, false, true, false, false),
            (404, false, false, false, true, false),
            (500, false, false, false, false, true),
            (599, false, false, false, false, true),
        ];

        for (status, successful, ok, redirect, client, server) in cases {
            let r = response(status, None);
            assert_eq!(r.successful(), successful, "successful {}", status);
            assert_eq!(r.ok(), ok, "ok {}", status);
            assert_eq!(r.redirect(), redirect, "redirect {}", status);
            assert_eq!(r.client_error(), client, "client_error {}", status);
            assert_eq!(r.server_error(), server, "server_error {}", status);
            assert_eq!(r.failed(), client || server, "failed {}", status);
        }
    }

    #[test]
    fn test_headers() {
        let response = response(200, None);

        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn test_transport_failure_raises() {
        let response = Response::from_transport_error(TransportError::Timeout);

        assert_eq!(response.status(), 0);
        assert!(response.status_code().is_none());
        assert!(!response.failed());
        assert!(response.transport_error().is_some());

        let exception = response.raise().unwrap_err();
        assert!(exception.to_string().ends_with("Request timed out"));
    }

    #[test]
    fn test_redirect_does_not_raise() {
        let response = response(302, None);
        assert!(response.throw().is_ok());
    }
}
