//! Main client implementation for the Wynncraft API

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    USER_AGENT_PRODUCT,
    config::ClientConfig,
    error::{Error, Result},
    http::RequestBuilder,
    ratelimit::{RateLimitSnapshot, RateLimiter},
    request::ApiRequest,
};

/// Client for the Wynncraft public API.
///
/// Cheap to clone; all clones share one rate-limit state, so every request
/// issued through them draws from the same budget.
///
/// # Example
///
/// ```rust,no_run
/// use wynn_api::Client;
///
/// # async fn example() -> wynn_api::Result<()> {
/// let client = Client::new();
/// let player: serde_json::Value = client.get("/v3/player/Salted").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    base_url: Url,
    user_agent: String,
    timeout: Duration,
    default_headers: HeaderMap,
    limiter: Arc<RateLimiter>,
}

impl Client {
    /// Create a client with the default configuration.
    ///
    /// # Panics
    ///
    /// This convenience method panics if the client cannot be built with the
    /// default configuration (which cannot happen unless the built-in base
    /// URL is invalid). For fallible construction use [`Client::builder()`].
    pub fn new() -> Self {
        Self::builder()
            .build()
            .expect("default client configuration is valid")
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] when the base URL is empty, unparsable,
    /// or not `http`/`https`.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::from_parts(config, None)
    }

    fn from_parts(config: ClientConfig, limiter: Option<Arc<RateLimiter>>) -> Result<Self> {
        let base_url_string = config
            .base_url
            .unwrap_or_else(|| crate::DEFAULT_BASE_URL.to_string());

        if base_url_string.trim().is_empty() {
            return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
        }

        let base_url: Url = base_url_string
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("{e}")))?;

        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::InvalidUrl(format!(
                    "Invalid URL scheme '{scheme}'. Only 'http' and 'https' are supported."
                )));
            }
        }

        let api_version = config
            .api_version
            .unwrap_or_else(|| crate::DEFAULT_API_VERSION.to_string());
        let limiter =
            limiter.unwrap_or_else(|| Arc::new(RateLimiter::new(config.rate_limit_max)));

        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                user_agent: format!("{USER_AGENT_PRODUCT}/{api_version}"),
                timeout: config.timeout,
                default_headers: config.default_headers,
                limiter,
            }),
        })
    }

    /// Fetch `path` with GET and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Any member of the error taxonomy; see [`crate::Error`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path)?.fetch().await
    }

    /// POST `payload` as JSON to `path` and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Any member of the error taxonomy; see [`crate::Error`].
    pub async fn post<T, P>(&self, path: &str, payload: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        self.request(Method::POST, path)?
            .json_body(payload)?
            .fetch()
            .await
    }

    /// Create a typed request for custom header or decode handling.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedMethod`] for anything but GET/POST, or
    /// [`Error::InvalidUrl`] if the URL cannot be constructed from the base
    /// URL and path.
    pub fn request(&self, method: Method, path: &str) -> Result<ApiRequest> {
        if method != Method::GET && method != Method::POST {
            return Err(Error::UnsupportedMethod(method));
        }

        let url = self.inner.base_url.join(path).map_err(|e| {
            Error::InvalidUrl(format!("Failed to construct URL from path '{path}': {e}"))
        })?;

        let mut builder = RequestBuilder::new(method, url)
            .timeout(self.inner.timeout)
            .header("user-agent", &self.inner.user_agent);

        for (key, value) in &self.inner.default_headers {
            if let Ok(value_str) = value.to_str() {
                builder = builder.header(key.as_str(), value_str);
            }
        }

        Ok(ApiRequest::new(builder, Arc::clone(&self.inner.limiter)))
    }

    /// The current rate-limit state as last reported by the server.
    pub fn rate_limit(&self) -> RateLimitSnapshot {
        self.inner.limiter.snapshot()
    }

    /// The shared rate limiter handle, for injecting the same budget into
    /// another client or inspecting it from the embedding application.
    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.inner.limiter)
    }

    /// Get the base URL for the API.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// The `User-Agent` value sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.inner.user_agent
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating a configured [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    limiter: Option<Arc<RateLimiter>>,
}

impl ClientBuilder {
    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the API version tag (also the version half of the `User-Agent`).
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = Some(api_version.into());
        self
    }

    /// Set the default timeout for requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the initial rate-limit budget used until the server reports
    /// real counters.
    pub fn rate_limit_max(mut self, max: u32) -> Self {
        self.config.rate_limit_max = max;
        self
    }

    /// Share an existing rate limiter instead of creating a fresh one, so
    /// several clients draw from a single budget.
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Add a custom default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to
    /// HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the client with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for a bad base URL.
    pub fn build(self) -> Result<Client> {
        Client::from_parts(self.config, self.limiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults() {
        let client = Client::new();
        assert_eq!(client.base_url(), "https://api.wynncraft.com/");
        assert_eq!(client.user_agent(), "wynn-api/v3");
    }

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .base_url("https://example.com")
            .api_version("v4")
            .timeout(Duration::from_secs(3))
            .rate_limit_max(60)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://example.com/");
        assert_eq!(client.user_agent(), "wynn-api/v4");
        assert_eq!(client.rate_limit().max, 60);
    }

    #[test]
    fn test_invalid_scheme_is_rejected() {
        let result = Client::builder().base_url("ftp://example.com").build();

        match result {
            Err(Error::InvalidUrl(msg)) => {
                assert!(msg.contains("ftp"));
                assert!(msg.contains("http"));
            }
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let result = Client::builder().base_url("   ").build();
        assert!(matches!(result, Err(Error::InvalidUrl(msg)) if msg.contains("empty")));
    }

    #[test]
    fn test_request_rejects_unsupported_methods() {
        let client = Client::new();
        let result = client.request(Method::DELETE, "/v3/player/Salted");
        assert!(matches!(result, Err(Error::UnsupportedMethod(_))));
    }

    #[test]
    fn test_request_carries_user_agent_and_default_headers() {
        let client = Client::builder()
            .base_url("https://example.com")
            .default_header("x-custom", "yes")
            .unwrap()
            .build()
            .unwrap();

        let request = client.request(Method::GET, "/v3/news").unwrap();
        assert_eq!(request.url().as_str(), "https://example.com/v3/news");
        // Headers live on the inner transport builder; reachable via Debug
        // for a smoke check without widening the API.
        let debug = format!("{request:?}");
        assert!(debug.contains("wynn-api/v3"));
        assert!(debug.contains("x-custom"));
    }

    #[test]
    fn test_clones_share_rate_limit_state() {
        let client = Client::new();
        let clone = client.clone();

        client.rate_limiter().update(42_000, 7, 180);
        assert_eq!(clone.rate_limit().remaining, 7);
    }

    #[test]
    fn test_injected_rate_limiter_is_shared_across_clients() {
        let limiter = Arc::new(RateLimiter::new(60));
        let a = Client::builder()
            .rate_limiter(Arc::clone(&limiter))
            .build()
            .unwrap();
        let b = Client::builder()
            .rate_limiter(Arc::clone(&limiter))
            .build()
            .unwrap();

        limiter.update(9_000, 1, 60);
        assert_eq!(a.rate_limit().remaining, 1);
        assert_eq!(b.rate_limit().remaining, 1);
    }
}
