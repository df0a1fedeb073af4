//! Typed request orchestration
//!
//! [`ApiRequest`] drives one logical call end to end: pre-flight rate-limit
//! gate, transport exchange, classification, and decode into the caller's
//! shape. It is constructed by [`Client::request`](crate::Client::request)
//! and consumed on dispatch.

use std::sync::Arc;

use http::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::http::{RequestBuilder, classify};
use crate::ratelimit::RateLimiter;

/// One logical call against the API, decoded into a caller-specified shape.
///
/// Headers may still be appended before dispatch; `fetch`/`fetch_with`
/// consume the request, so it is dispatched at most once.
#[derive(Debug)]
pub struct ApiRequest {
    builder: RequestBuilder,
    limiter: Arc<RateLimiter>,
}

impl ApiRequest {
    pub(crate) fn new(builder: RequestBuilder, limiter: Arc<RateLimiter>) -> Self {
        Self { builder, limiter }
    }

    /// Append a header.
    ///
    /// # Panics
    /// Panics on an invalid header name or value; see
    /// [`try_header`](Self::try_header) for the fallible version.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a header, rejecting invalid names or values.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeaderName`] or [`Error::InvalidHeaderValue`].
    pub fn try_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.builder = self.builder.try_header(key, value)?;
        Ok(self)
    }

    /// Serialize `payload` to JSON and attach it as the request entity.
    ///
    /// Always sets `Content-Type: application/json`.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] if the payload cannot be serialized.
    pub fn json_body<P: Serialize + ?Sized>(mut self, payload: &P) -> Result<Self> {
        let bytes = serde_json::to_vec(payload)?;
        self.builder = self
            .builder
            .header(CONTENT_TYPE.as_str(), "application/json")
            .body(bytes);
        Ok(self)
    }

    /// The URL this request targets.
    pub fn url(&self) -> &url::Url {
        self.builder.url()
    }

    /// Dispatch the request and decode the response body into `T`.
    ///
    /// # Errors
    ///
    /// Any member of the classification taxonomy, or [`Error::Decode`] when
    /// the exchange succeeded but the body does not match `T`.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T> {
        let text = self.dispatch().await?;
        serde_json::from_str(&text).map_err(Error::Decode)
    }

    /// Dispatch the request and decode the response body with a
    /// caller-supplied function.
    ///
    /// Useful when the target shape is dynamic or when the caller wants to
    /// decode into a borrowed intermediate like [`serde_json::Value`] and
    /// pick it apart.
    ///
    /// # Errors
    /// As [`fetch`](Self::fetch).
    pub async fn fetch_with<T, F>(self, decode: F) -> Result<T>
    where
        F: FnOnce(&str) -> serde_json::Result<T>,
    {
        let text = self.dispatch().await?;
        decode(&text).map_err(Error::Decode)
    }

    /// Run the pipeline up to (and including) classification.
    #[tracing::instrument(
        name = "api_request",
        skip(self),
        fields(method = %self.builder.method(), url = %self.builder.url())
    )]
    async fn dispatch(self) -> Result<String> {
        let Self { builder, limiter } = self;

        if limiter.is_rate_limited() {
            let reset_at = limiter.reset_timestamp();
            warn!(reset_at, "request blocked by local rate limit budget");
            return Err(Error::RateLimitBudgetExhausted { reset_at });
        }

        let url = builder.url().clone();
        debug!("dispatching request");
        let start = std::time::Instant::now();

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(elapsed_ms = start.elapsed().as_millis() as u64, error = %e, "transport failure");
                return Err(e);
            }
        };

        let outcome = classify(response, &url, &limiter);
        match &outcome {
            Ok(body) => {
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    bytes = body.len(),
                    "request completed"
                );
            }
            Err(e) => {
                warn!(elapsed_ms = start.elapsed().as_millis() as u64, error = %e, "request failed");
            }
        }

        outcome
    }
}
