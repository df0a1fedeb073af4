//! # wynn-api
//!
//! Typed async client for the Wynncraft public API:
//! - GET/POST requests decoded into caller-specified shapes
//! - proactive rate limiting driven by the server's `RateLimit-*` headers
//! - a closed error taxonomy, so every failure mode is a variant to match on
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use wynn_api::Client;
//!
//! #[derive(Deserialize)]
//! struct Player {
//!     username: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new();
//!
//!     let player: Player = client.get("/v3/player/Salted").await?;
//!     println!("{}", player.username);
//!     Ok(())
//! }
//! ```
//!
//! ## Rate limiting
//!
//! Every response carries the server's remaining-budget counters; the client
//! records them and refuses to dispatch once the budget is exhausted,
//! returning [`Error::RateLimitBudgetExhausted`] with the reset timestamp
//! instead of burning a doomed request. A 429 that slips through anyway (two
//! processes sharing one budget, clock skew) surfaces as
//! [`Error::RateLimited`] and is marked retryable.

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
pub use http::{RequestBuilder, Response};
pub use ratelimit::{RateLimitSnapshot, RateLimiter};
pub use request::ApiRequest;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
pub mod request;

// Re-export key dependencies for convenience
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use wynn_api::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Client, ClientBuilder, ClientConfig, Error, Result,
        http::Method,
        ratelimit::{RateLimitSnapshot, RateLimiter},
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.wynncraft.com";

/// Default API version tag
pub const DEFAULT_API_VERSION: &str = "v3";

/// Product half of the `User-Agent` value
pub const USER_AGENT_PRODUCT: &str = "wynn-api";
