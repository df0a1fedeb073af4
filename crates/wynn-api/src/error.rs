//! Error types for the Wynncraft API client
//!
//! The error enum is deliberately closed: every way a typed request can fail
//! is its own variant, so callers handle each outcome explicitly instead of
//! matching on exception strings.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with a client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Wynncraft API client.
///
/// One variant per member of the classification taxonomy, plus the
/// construction and configuration failures a client can hit before any
/// request is dispatched.
#[derive(Debug, Error)]
pub enum Error {
    /// The local rate-limit budget is exhausted; no network exchange was
    /// attempted. Carries the absolute reset timestamp (epoch milliseconds)
    /// after which a retry is expected to succeed.
    #[error("cannot make request, rate limit budget would be exceeded; retry after {reset_at}")]
    RateLimitBudgetExhausted {
        /// Epoch-millisecond timestamp after which the budget refills
        reset_at: i64,
    },

    /// The server rejected the request with 429 despite the pre-flight gate
    /// (clock skew, or another caller sharing the same budget).
    #[error("429: Too Many Requests for {url}")]
    RateLimited {
        /// The requested URL
        url: String,
        /// Reset timestamp (epoch milliseconds) parsed from the
        /// `ratelimit-reset` header, if the server sent one
        reset_at: Option<i64>,
    },

    /// The server rejected the request as malformed (400).
    #[error("400: Bad Request for {url}")]
    BadRequest {
        /// The requested URL
        url: String,
    },

    /// The requested resource does not exist (404).
    #[error("404: Not Found for {url}")]
    NotFound {
        /// The requested URL
        url: String,
    },

    /// The API is temporarily unavailable (503).
    #[error("503: Service Unavailable for {url}")]
    ServiceUnavailable {
        /// The requested URL
        url: String,
    },

    /// The transport succeeded with 200 but the body was a bare
    /// `{"message": ...}` or `{"error": ...}` envelope: a domain-level
    /// failure reported by the API.
    #[error("API error when requesting {url}: {message}")]
    Api {
        /// The requested URL
        url: String,
        /// Message text extracted verbatim from the envelope
        message: String,
    },

    /// A 200 response arrived with an empty body.
    #[error("no body in request response for {url}")]
    NoBody {
        /// The requested URL
        url: String,
    },

    /// A 200 response declared a content type other than `application/json`.
    #[error("unexpected content type (not application/json) for {url}: {content_type}")]
    UnexpectedContentType {
        /// The requested URL
        url: String,
        /// The declared content type (empty when the header was absent)
        content_type: String,
    },

    /// Catch-all for status codes outside the known taxonomy.
    #[error("unexpected status code {status} returned by API for request {url}")]
    UnexpectedStatus {
        /// The requested URL
        url: String,
        /// The actual HTTP status code
        status: u16,
    },

    /// The exchange did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure: DNS, connect, or I/O.
    #[error("connection error: {0}")]
    Connection(String),

    /// The response body could not be decoded into the requested shape.
    /// Distinct from the network/API taxonomy: the exchange itself succeeded.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid URL provided or constructed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Invalid HTTP header name.
    #[error("invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// The client only issues GET and POST requests.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(http::Method),
}

impl Error {
    /// The HTTP status code associated with this error, or `-1` when the
    /// failure is not tied to a concrete status (pre-flight gate, transport
    /// failures, body-shape failures).
    pub fn status(&self) -> i32 {
        match self {
            Error::RateLimited { .. } => 429,
            Error::BadRequest { .. } => 400,
            Error::NotFound { .. } => 404,
            Error::ServiceUnavailable { .. } => 503,
            Error::UnexpectedStatus { status, .. } => i32::from(*status),
            _ => -1,
        }
    }

    /// Whether waiting until the reset timestamp and resubmitting is
    /// appropriate. Only the two rate-limit variants qualify; everything
    /// else is terminal for the call.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::RateLimitBudgetExhausted { .. } | Error::RateLimited { .. }
        )
    }

    /// The absolute reset timestamp (epoch milliseconds) for rate-limit
    /// errors, when known.
    pub fn reset_at(&self) -> Option<i64> {
        match self {
            Error::RateLimitBudgetExhausted { reset_at } => Some(*reset_at),
            Error::RateLimited { reset_at, .. } => *reset_at,
            _ => None,
        }
    }
}
