//! HTTP layer: one-shot transport and response classification
//!
//! One exchange is one [`RequestBuilder::send`] call; nothing transport-side
//! is held across calls. Classification of a finished exchange lives in
//! [`classify`], which also feeds the rate limiter from response headers.

pub use response::Response;
pub use transport::{DEFAULT_TIMEOUT, RequestBuilder};

pub(crate) use classify::classify;

mod classify;
mod response;
mod transport;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
