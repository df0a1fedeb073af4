//! Raw HTTP response

use std::borrow::Cow;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};

/// The raw result of one HTTP exchange: status, headers, body bytes.
///
/// Header lookup is case-insensitive (`http::HeaderMap` semantics). The body
/// may be empty; classification decides what that means.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// The declared `Content-Type`, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        headers
    }

    #[test]
    fn test_accessors() {
        let response = Response::new(StatusCode::OK, json_headers(), b"{}".to_vec());

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), b"{}");
        assert_eq!(response.body_text(), "{}");
        assert_eq!(response.content_type(), Some("application/json"));
    }

    #[test]
    fn test_content_type_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Content-Type".parse::<http::HeaderName>().unwrap(),
            "application/json".parse().unwrap(),
        );
        let response = Response::new(StatusCode::OK, headers, Vec::new());

        assert_eq!(response.content_type(), Some("application/json"));
    }

    #[test]
    fn test_missing_content_type() {
        let response = Response::new(StatusCode::OK, HeaderMap::new(), Vec::new());
        assert_eq!(response.content_type(), None);
    }
}
