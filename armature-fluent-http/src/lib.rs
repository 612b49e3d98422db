//! # Armature Fluent HTTP
//!
//! A chainable HTTP request builder with deferred error raising.
//!
//! ## Features
//!
//! - **Fluent configuration**: Auth, headers, body format, timeouts and retries
//! - **Body formats**: JSON, URL-encoded forms and multipart
//! - **No surprise errors**: A 4xx/5xx status or a dropped connection still
//!   yields a [`Response`]; call [`Response::throw`] to turn it into an error
//! - **Pluggable transport**: reqwest by default, any [`Transport`] on demand
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use armature_fluent_http::RequestBuilder;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let response = RequestBuilder::new("https://httpbin.org")
//!         .with_basic_auth("username", "password")
//!         .get("/basic-auth/username/password")
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     println!("Authenticated: {}", response.json()?["authenticated"]);
//!
//!     let created = RequestBuilder::new("https://httpbin.org")
//!         .as_form()
//!         .retry(3, None)
//!         .post_with("/post", &json!({"item": "widget", "quantity": 5}))
//!         .await?
//!         .throw()?;
//!
//!     println!("Echo: {}", created.body());
//!     Ok(())
//! }
//! ```
//!
//! ## Shared Defaults
//!
//! ```rust,no_run
//! use armature_fluent_http::{HttpClient, HttpClientConfig};
//! use std::time::Duration;
//!
//! # async fn run() -> armature_fluent_http::Result<()> {
//! let client = HttpClient::new(
//!     HttpClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .timeout(Duration::from_secs(30))
//!         .default_header("X-Api-Version", "2")
//!         .build(),
//! );
//!
//! let users = client.request().with_token("secret").get("/users").await?;
//! if users.failed() {
//!     eprintln!("Request failed with {}", users.status());
//! }
//! # Ok(())
//! # }
//! ```

mod body;
mod client;
mod config;
mod error;
mod options;
mod reqwest_transport;
mod request;
mod response;
mod retry;
mod transport;

pub use body::{BodyFormat, EncodedBody, Payload};
pub use client::HttpClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use error::{FluentHttpError, RequestException, Result};
pub use options::{RequestConfig, RequestOptions};
pub use reqwest_transport::ReqwestTransport;
pub use request::RequestBuilder;
pub use response::Response;
pub use retry::{RETRY_STATUS_CODES, RetryPolicy};
pub use transport::{
    RawResponse, Transport, TransportError, TransportOutcome, TransportRequest, TransportSettings,
};

// Re-export common types
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use reqwest::cookie::Jar;
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use armature_fluent_http::prelude::*;
/// ```
pub mod prelude {
    pub use crate::body::BodyFormat;
    pub use crate::client::HttpClient;
    pub use crate::config::{HttpClientConfig, HttpClientConfigBuilder};
    pub use crate::error::{FluentHttpError, RequestException, Result};
    pub use crate::options::RequestOptions;
    pub use crate::request::RequestBuilder;
    pub use crate::response::Response;
    pub use crate::transport::{Transport, TransportError, TransportOutcome};
    pub use http::{HeaderMap, Method, StatusCode, header};
}
