//! Archive download.
//!
//! The extractor only needs "GET this URL, give me status and body", so the
//! HTTP stack sits behind the small [`HttpClient`] trait. [`ReqwestClient`]
//! is the production implementation; tests plug in canned responses.

mod http;

use std::future::Future;

use bytes::Bytes;
use tracing::debug;
use tracing::warn;

use crate::ExtractionError;
use crate::ExtractorConfig;
use crate::Result;
use crate::sniff;

pub use http::ReqwestClient;

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct FetchedPayload {
    /// Response status code.
    pub status: u16,
    /// Declared `Content-Type`, if any.
    pub content_type: Option<String>,
    /// Full response body.
    pub body: Bytes,
}

impl FetchedPayload {
    /// Returns `true` for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Why a request produced no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// DNS, connect, TLS, or body transfer failure.
    Transport(String),
    /// The request was blocked by a cross-origin policy.
    CrossOrigin(String),
}

/// Minimal asynchronous HTTP client used to download archives.
///
/// Implementations send a single unauthenticated GET (no cookies, no
/// credentials) and never retry.
pub trait HttpClient: Send + Sync {
    /// Issues a GET for `url` with the given `Accept` header.
    ///
    /// A response with any status code is a success at this level; only a
    /// request that produced no response is a [`FetchFailure`].
    fn get(
        &self,
        url: &str,
        accept: &str,
    ) -> impl Future<Output = std::result::Result<FetchedPayload, FetchFailure>> + Send;
}

/// Downloads the archive at `url` and returns its non-empty body.
///
/// # Errors
///
/// - [`ExtractionError::Network`] / [`ExtractionError::Cors`] if no response
///   was received
/// - [`ExtractionError::Http`] for a non-2xx status
/// - [`ExtractionError::EmptyPayload`] for a zero-length body
pub async fn fetch_archive<C: HttpClient>(
    client: &C,
    url: &str,
    config: &ExtractorConfig,
) -> Result<Bytes> {
    let payload = client
        .get(url, &config.accept)
        .await
        .map_err(|failure| match failure {
            FetchFailure::Transport(reason) => ExtractionError::Network {
                url: url.to_string(),
                reason,
            },
            FetchFailure::CrossOrigin(reason) => ExtractionError::Cors {
                url: url.to_string(),
                reason,
            },
        })?;

    if !payload.is_success() {
        let excerpt = body_excerpt(&payload.body, config.error_excerpt_len);
        warn!(status = payload.status, %excerpt, "archive request failed");
        return Err(ExtractionError::Http {
            status: payload.status,
            excerpt,
        });
    }

    debug!(
        content_type = payload.content_type.as_deref().unwrap_or("<none>"),
        bytes = payload.body.len(),
        preview = %sniff::preview(&payload.body, 16),
        "archive response received"
    );

    if payload.body.is_empty() {
        return Err(ExtractionError::EmptyPayload);
    }

    Ok(payload.body)
}

/// Cuts an error response body down to `max_chars` characters, marking the
/// cut with `...`.
#[must_use]
pub fn body_excerpt(body: &[u8], max_chars: usize) -> String {
    let text = String::from_utf8_lossy(body);
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::StaticClient;

    #[test]
    fn test_body_excerpt_short() {
        assert_eq!(body_excerpt(b"Not Found", 100), "Not Found");
    }

    #[test]
    fn test_body_excerpt_truncates() {
        let body = "x".repeat(150);
        let excerpt = body_excerpt(body.as_bytes(), 100);
        assert_eq!(excerpt.len(), 103);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_body_excerpt_exact_length() {
        let body = "y".repeat(100);
        assert_eq!(body_excerpt(body.as_bytes(), 100), body);
    }

    #[test]
    fn test_body_excerpt_multibyte() {
        let body = "é".repeat(120);
        let excerpt = body_excerpt(body.as_bytes(), 100);
        assert_eq!(excerpt.chars().count(), 103);
    }

    #[test]
    fn test_is_success() {
        let mut payload = FetchedPayload {
            status: 200,
            content_type: None,
            body: Bytes::new(),
        };
        assert!(payload.is_success());
        payload.status = 204;
        assert!(payload.is_success());
        payload.status = 302;
        assert!(!payload.is_success());
        payload.status = 500;
        assert!(!payload.is_success());
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let client = StaticClient::ok(b"PK\x05\x06".to_vec());
        let config = ExtractorConfig::default();
        let body = fetch_archive(&client, "https://example.com/a.zip", &config)
            .await
            .unwrap();
        assert_eq!(&body[..], b"PK\x05\x06");
    }

    #[tokio::test]
    async fn test_fetch_sends_accept_header() {
        let client = StaticClient::ok(b"PK".to_vec());
        let config = ExtractorConfig::default();
        fetch_archive(&client, "https://example.com/a.zip", &config)
            .await
            .unwrap();
        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "https://example.com/a.zip");
        assert_eq!(requests[0].1, config.accept);
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let client = StaticClient::status(403, "<Error>AccessDenied</Error>".repeat(10));
        let config = ExtractorConfig::default();
        let err = fetch_archive(&client, "https://example.com/a.zip", &config)
            .await
            .unwrap_err();
        match err {
            ExtractionError::Http { status, excerpt } => {
                assert_eq!(status, 403);
                assert!(excerpt.ends_with("..."));
                assert_eq!(excerpt.chars().count(), 103);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let client = StaticClient::ok(Vec::new());
        let config = ExtractorConfig::default();
        let err = fetch_archive(&client, "https://example.com/a.zip", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyPayload));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let client = StaticClient::failing(FetchFailure::Transport("dns error".to_string()));
        let config = ExtractorConfig::default();
        let err = fetch_archive(&client, "https://nowhere.invalid/a.zip", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Network { ref reason, .. } if reason == "dns error"));
    }

    #[tokio::test]
    async fn test_fetch_cross_origin_failure() {
        let client = StaticClient::failing(FetchFailure::CrossOrigin("blocked".to_string()));
        let config = ExtractorConfig::default();
        let err = fetch_archive(&client, "https://example.com/a.zip", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Cors { .. }));
    }
}
