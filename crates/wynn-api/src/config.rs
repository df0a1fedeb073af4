//! Configuration for the Wynncraft API client

use std::time::Duration;

use http::HeaderMap;

use crate::http::DEFAULT_TIMEOUT;
use crate::ratelimit::DEFAULT_RATE_LIMIT_MAX;

/// Configuration for the API client.
///
/// Everything here has a sensible default; an empty config builds a client
/// that talks to the public API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the API
    pub base_url: Option<String>,

    /// API version tag; also the version half of the `User-Agent` value
    pub api_version: Option<String>,

    /// Timeout applied to both connect and response-wait phases
    pub timeout: Duration,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,

    /// Initial request budget for the rate limiter, until the server
    /// reports real counters
    pub rate_limit_max: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_version: None,
            timeout: DEFAULT_TIMEOUT,
            default_headers: HeaderMap::new(),
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored when present. Recognized variables:
    /// - `WYNN_API_BASE_URL` for the API base URL
    /// - `WYNN_API_VERSION` for the API version tag
    /// - `WYNN_API_TIMEOUT_MS` for the request timeout (milliseconds)
    /// - `WYNN_API_RATE_LIMIT_MAX` for the initial request budget
    #[cfg(feature = "env")]
    pub fn from_env() -> Self {
        use std::env;

        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(base_url) = env::var("WYNN_API_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(api_version) = env::var("WYNN_API_VERSION") {
            config.api_version = Some(api_version);
        }

        if let Ok(timeout_str) = env::var("WYNN_API_TIMEOUT_MS")
            && let Ok(timeout_ms) = timeout_str.parse::<u64>()
        {
            config.timeout = Duration::from_millis(timeout_ms);
        }

        if let Ok(max_str) = env::var("WYNN_API_RATE_LIMIT_MAX")
            && let Ok(max) = max_str.parse::<u32>()
        {
            config.rate_limit_max = max;
        }

        config
    }

    /// Merge this configuration with another, with the other taking precedence.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.api_version.is_some() {
            self.api_version = other.api_version;
        }
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if !other.default_headers.is_empty() {
            for (key, value) in other.default_headers.iter() {
                self.default_headers.insert(key.clone(), value.clone());
            }
        }
        if other.rate_limit_max != DEFAULT_RATE_LIMIT_MAX {
            self.rate_limit_max = other.rate_limit_max;
        }

        self
    }
}

/// Builder for creating a [`ClientConfig`] with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the API version tag.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = Some(api_version.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the initial rate-limit budget.
    pub fn rate_limit_max(mut self, max: u32) -> Self {
        self.config.rate_limit_max = max;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to
    /// HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> crate::Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.rate_limit_max, DEFAULT_RATE_LIMIT_MAX);
        assert!(config.base_url.is_none());
        assert!(config.api_version.is_none());
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfigBuilder::new()
            .base_url("https://example.com")
            .api_version("v3")
            .timeout(Duration::from_millis(2_500))
            .rate_limit_max(60)
            .default_header("x-custom", "value")
            .unwrap()
            .build();

        assert_eq!(config.base_url, Some("https://example.com".to_string()));
        assert_eq!(config.api_version, Some("v3".to_string()));
        assert_eq!(config.timeout, Duration::from_millis(2_500));
        assert_eq!(config.rate_limit_max, 60);
        assert!(config.default_headers.contains_key("x-custom"));
    }

    #[test]
    fn test_config_merge_precedence() {
        let base = ClientConfigBuilder::new()
            .base_url("https://base.example.com")
            .api_version("v2")
            .build();
        let overlay = ClientConfigBuilder::new()
            .base_url("https://overlay.example.com")
            .timeout(Duration::from_millis(500))
            .build();

        let merged = base.merge(overlay);

        assert_eq!(
            merged.base_url,
            Some("https://overlay.example.com".to_string())
        );
        // The overlay's None must not clobber the base's value.
        assert_eq!(merged.api_version, Some("v2".to_string()));
        assert_eq!(merged.timeout, Duration::from_millis(500));
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_variables() {
        temp_env::with_vars(
            [
                (
                    "WYNN_API_BASE_URL",
                    Some("https://env.example.com".to_string()),
                ),
                ("WYNN_API_VERSION", Some("v9".to_string())),
                ("WYNN_API_TIMEOUT_MS", Some("1500".to_string())),
                ("WYNN_API_RATE_LIMIT_MAX", Some("90".to_string())),
            ],
            || {
                let config = ClientConfig::from_env();
                assert_eq!(
                    config.base_url,
                    Some("https://env.example.com".to_string())
                );
                assert_eq!(config.api_version, Some("v9".to_string()));
                assert_eq!(config.timeout, Duration::from_millis(1500));
                assert_eq!(config.rate_limit_max, 90);
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_ignores_unparsable_timeout() {
        temp_env::with_vars(
            [("WYNN_API_TIMEOUT_MS", Some("forever".to_string()))],
            || {
                let config = ClientConfig::from_env();
                assert_eq!(config.timeout, DEFAULT_TIMEOUT);
            },
        );
    }
}
