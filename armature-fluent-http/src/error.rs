//! Fluent HTTP error types.

use crate::Response;
use thiserror::Error;

/// Result type for fluent HTTP operations.
pub type Result<T> = std::result::Result<T, FluentHttpError>;

/// Fluent HTTP errors.
///
/// HTTP error statuses and transport failures are not represented here
/// until the caller opts in through [`Response::throw`]; every other
/// variant is a configuration problem detected before any network call.
#[derive(Debug, Error)]
pub enum FluentHttpError {
    /// The requested configuration is not supported.
    #[error("{0}")]
    NotImplemented(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The payload could not be encoded for the selected body format.
    #[error("Failed to encode payload: {0}")]
    Encode(String),

    /// The response body is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A failed response raised on request.
    #[error(transparent)]
    Request(#[from] RequestException),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl FluentHttpError {
    /// Check if this error was caused by the request configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NotImplemented(_) | Self::InvalidUrl(_) | Self::Encode(_) | Self::UrlParse(_)
        )
    }

    /// Check if this is a response body parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Get the failed response if this error was raised from one.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Request(e) => Some(e.response()),
            _ => None,
        }
    }
}

/// Raised by [`Response::throw`] for a client error, server error or
/// transport failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RequestException {
    message: String,
    response: Box<Response>,
}

impl RequestException {
    pub(crate) fn new(response: Response) -> Self {
        let message = match response.transport_error() {
            Some(error) => format!(
                "HTTP request returned status code {}: {}",
                response.status(),
                error
            ),
            None => format!("HTTP request returned status code {}.", response.status()),
        };

        Self {
            message,
            response: Box::new(response),
        }
    }

    /// The response that failed.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Consume the exception and return the response.
    pub fn into_response(self) -> Response {
        *self.response
    }

    /// The status code of the failed response.
    pub fn status(&self) -> u16 {
        self.response.status()
    }
}
