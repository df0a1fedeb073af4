//! Response classification
//!
//! Turns one finished exchange into the terminal outcome of that exchange:
//! either the success body text, ready for decoding, or one member of the
//! error taxonomy. Every classified response also gets exactly one
//! rate-limit update attempt, whatever the outcome.

use chrono::Utc;
use http::HeaderMap;
use http::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::Response;
use crate::error::{Error, Result};
use crate::ratelimit::RateLimiter;

const HEADER_RESET: &str = "RateLimit-Reset";
const HEADER_LIMIT: &str = "RateLimit-Limit";
const HEADER_REMAINING: &str = "RateLimit-Remaining";

/// Reset header consulted on a 429 specifically.
const HEADER_REACTIVE_RESET: &str = "ratelimit-reset";

/// The API sometimes answers HTTP 200 for domain-level errors, with a body
/// that is exactly one top-level `message` or `error` string and nothing
/// else. `deny_unknown_fields` keeps real payloads that happen to contain a
/// `message` field from matching.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ErrorEnvelope {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorEnvelope {
    /// The envelope text, when the body was the bare single-field shape.
    fn into_text(self) -> Option<String> {
        match (self.message, self.error) {
            (Some(message), None) => Some(message),
            (None, Some(error)) => Some(error),
            _ => None,
        }
    }
}

/// Classify one finished exchange.
///
/// Updates the rate limiter from the response headers first (best-effort,
/// independent of the outcome), then maps status code and body shape to the
/// classified outcome.
pub(crate) fn classify(response: Response, url: &Url, limiter: &RateLimiter) -> Result<String> {
    update_rate_limit(response.headers(), limiter);

    match response.status() {
        StatusCode::OK => {
            let body = response.body_text();
            if body.is_empty() {
                return Err(Error::NoBody {
                    url: url.to_string(),
                });
            }
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body)
                && let Some(message) = envelope.into_text()
            {
                return Err(Error::Api {
                    url: url.to_string(),
                    message,
                });
            }
            let content_type = response.content_type().unwrap_or_default();
            if !content_type.contains("application/json") {
                return Err(Error::UnexpectedContentType {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
            Ok(body.into_owned())
        }
        StatusCode::BAD_REQUEST => Err(Error::BadRequest {
            url: url.to_string(),
        }),
        StatusCode::TOO_MANY_REQUESTS => {
            let reset_at = parse_header_i64(response.headers(), HEADER_REACTIVE_RESET)
                .map(|seconds| now_ms() + seconds.saturating_mul(1_000));
            if let Some(reset_at) = reset_at {
                limiter.exhaust_until(reset_at);
            }
            Err(Error::RateLimited {
                url: url.to_string(),
                reset_at,
            })
        }
        StatusCode::NOT_FOUND => Err(Error::NotFound {
            url: url.to_string(),
        }),
        StatusCode::SERVICE_UNAVAILABLE => Err(Error::ServiceUnavailable {
            url: url.to_string(),
        }),
        other => Err(Error::UnexpectedStatus {
            url: url.to_string(),
            status: other.as_u16(),
        }),
    }
}

/// Best-effort state update from the counter triple.
///
/// All three headers must be present and parse; otherwise the update is
/// skipped for this exchange and prior state stands. The reset header is
/// seconds-from-now and is converted to an absolute timestamp here.
fn update_rate_limit(headers: &HeaderMap, limiter: &RateLimiter) {
    let (Some(reset_seconds), Some(max), Some(remaining)) = (
        parse_header_i64(headers, HEADER_RESET),
        parse_header_u32(headers, HEADER_LIMIT),
        parse_header_u32(headers, HEADER_REMAINING),
    ) else {
        debug!("rate limit headers missing or unparsable, keeping previous state");
        return;
    };

    limiter.update(now_ms() + reset_seconds.saturating_mul(1_000), remaining, max);
}

fn parse_header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|s| s.parse().ok())
}

fn parse_header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|s| s.parse().ok())
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
