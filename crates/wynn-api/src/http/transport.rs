//! One-shot HTTP transport

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

use super::Response;
use crate::error::{Error, Result};

/// Default bound for both connection acquisition and response wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Builder for a single HTTP exchange.
///
/// Headers may be appended up to the moment of dispatch; later insertions of
/// the same name win. [`send`](Self::send) consumes the builder — a
/// descriptor is dispatched at most once, and a caller-side retry is a new
/// builder.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Duration,
}

impl RequestBuilder {
    /// Create a request builder for the given method and URL.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a header.
    ///
    /// # Panics
    /// Panics if the header name or value contains invalid characters.
    /// For fallible header setting, use [`try_header`](Self::try_header) instead.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key_str = key.into();
        let value_str = value.into();

        let key = key_str
            .parse::<HeaderName>()
            .unwrap_or_else(|e| panic!("Invalid header name '{}': {}", key_str, e));
        let value = value_str
            .parse::<HeaderValue>()
            .unwrap_or_else(|e| panic!("Invalid header value '{}': {}", value_str, e));

        self.headers.insert(key, value);
        self
    }

    /// Try to set a header, returning an error if the name or value is invalid.
    ///
    /// # Errors
    /// Returns an error if the header name or value contains invalid characters.
    pub fn try_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key = key_str
            .parse::<HeaderName>()
            .map_err(|_| Error::InvalidHeaderName(key_str))?;
        let value = value_str
            .parse::<HeaderValue>()
            .map_err(|_| Error::InvalidHeaderValue(value_str))?;

        self.headers.insert(key, value);
        Ok(self)
    }

    /// Set the request body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the timeout applied to both connect and response-wait phases.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Perform the exchange.
    ///
    /// A fresh `reqwest::Client` is built for this call and dropped with it,
    /// so no connection or client handle outlives the exchange.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when the deadline elapses, [`Error::Connection`]
    /// for DNS/connect/I-O failures, [`Error::HttpClient`] if the underlying
    /// client cannot be constructed. A response with an error status is NOT
    /// an `Err` here; classification happens upstream.
    pub async fn send(self) -> Result<Response> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        let mut req = client.request(self.method.clone(), self.url.as_str());
        for (key, value) in &self.headers {
            req = req.header(key, value);
        }
        if let Some(body) = self.body {
            req = req.body(body);
        }

        match req.send().await {
            Ok(resp) => {
                let status = resp.status();
                let headers = resp.headers().clone();
                let body = resp
                    .bytes()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            Error::Timeout(self.timeout)
                        } else {
                            Error::Connection(e.to_string())
                        }
                    })?
                    .to_vec();

                Ok(Response::new(status, headers, body))
            }
            Err(e) if e.is_timeout() => Err(Error::Timeout(self.timeout)),
            Err(e) => Err(Error::Connection(e.to_string())),
        }
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the timeout.
    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_url() -> Url {
        "https://api.wynncraft.com/v3/player/Salted".parse().unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let builder = RequestBuilder::new(Method::GET, test_url());

        assert_eq!(builder.method(), &Method::GET);
        assert_eq!(builder.timeout_duration(), DEFAULT_TIMEOUT);
        assert!(builder.headers().is_empty());
    }

    #[test]
    fn test_header_later_wins_on_duplicate_name() {
        let builder = RequestBuilder::new(Method::GET, test_url())
            .header("accept", "text/plain")
            .header("accept", "application/json");

        assert_eq!(builder.headers().get("accept").unwrap(), "application/json");
        assert_eq!(builder.headers().len(), 1);
    }

    #[test]
    fn test_try_header_rejects_invalid_name() {
        let result = RequestBuilder::new(Method::GET, test_url()).try_header("bad name", "value");
        assert!(matches!(result, Err(Error::InvalidHeaderName(_))));
    }

    #[test]
    fn test_try_header_rejects_invalid_value() {
        let result = RequestBuilder::new(Method::GET, test_url()).try_header("x-ok", "bad\nvalue");
        assert!(matches!(result, Err(Error::InvalidHeaderValue(_))));
    }

    #[test]
    fn test_timeout_override() {
        let builder =
            RequestBuilder::new(Method::POST, test_url()).timeout(Duration::from_millis(250));
        assert_eq!(builder.timeout_duration(), Duration::from_millis(250));
    }
}
