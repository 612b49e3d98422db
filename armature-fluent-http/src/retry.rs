//! Retry policy carried to the transport.

use http::{HeaderMap, Method};
use std::time::Duration;

/// Status codes that trigger a retry.
pub const RETRY_STATUS_CODES: [u16; 7] = [408, 413, 429, 500, 502, 503, 504];

/// Status codes whose `Retry-After` header is honored.
const RETRY_AFTER_STATUS_CODES: [u16; 3] = [413, 429, 503];

/// Methods that are safe to replay.
const RETRY_METHODS: [Method; 6] = [
    Method::GET,
    Method::PUT,
    Method::HEAD,
    Method::DELETE,
    Method::OPTIONS,
    Method::TRACE,
];

const INITIAL_DELAY: Duration = Duration::from_millis(300);

/// Retry configuration for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub limit: u32,
    /// Upper bound for any single delay. Unset means no cap.
    pub max_delay: Option<Duration>,
}

impl RetryPolicy {
    /// Create a retry policy.
    pub fn new(limit: u32, max_delay: Option<Duration>) -> Self {
        Self { limit, max_delay }
    }

    /// Check if another attempt is allowed after `retries` retries.
    pub fn allows(&self, retries: u32) -> bool {
        retries < self.limit
    }

    /// Check if the method may be replayed safely.
    pub fn retries_method(&self, method: &Method) -> bool {
        RETRY_METHODS.contains(method)
    }

    /// Check if a status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        RETRY_STATUS_CODES.contains(&status)
    }

    /// Delay before retry number `retry` (1-indexed).
    ///
    /// Exponential from 300ms, unless the server sent a numeric
    /// `Retry-After` with a status that honors it.
    pub fn delay_for(&self, retry: u32, status: Option<u16>, headers: Option<&HeaderMap>) -> Duration {
        let retry_after = status
            .filter(|s| RETRY_AFTER_STATUS_CODES.contains(s))
            .and(headers)
            .and_then(|h| h.get(http::header::RETRY_AFTER))
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let delay = retry_after.unwrap_or_else(|| {
            let factor = 2u32.saturating_pow(retry.saturating_sub(1));
            INITIAL_DELAY.saturating_mul(factor)
        });

        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}
