//! Single-request HTTP access to the upstream catalog.
//!
//! [`HttpFetcher`] performs exactly one GET per call and classifies the
//! outcome into a [`SyncError`]. It never retries on its own; that is the
//! job of [`crate::retry::RetryPolicy`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;

use crate::error::SyncError;

/// Delay assumed when a 429 response carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Source of raw catalog pages.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetch one page and return its JSON body unchanged.
    async fn fetch(&self, url: &str) -> Result<serde_json::Value, SyncError>;
}

/// [`CatalogFetcher`] backed by a `reqwest` client with a fixed timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CatalogFetcher for HttpFetcher {
    /// On 429 this sleeps for the server-requested delay *before* returning
    /// [`SyncError::RateLimited`], so the retry backoff is added on top of it.
    async fn fetch(&self, url: &str) -> Result<serde_json::Value, SyncError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(
                response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok()),
            );
            tracing::warn!(
                url,
                retry_after_secs = retry_after.as_secs(),
                "Upstream rate limited, honouring Retry-After",
            );
            tokio::time::sleep(retry_after).await;
            return Err(SyncError::RateLimited { retry_after });
        }

        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| SyncError::Decode(e.to_string()))
    }
}

/// Interpret a `Retry-After` value as whole seconds.
///
/// Missing or non-numeric values (including the HTTP-date form) fall back
/// to [`DEFAULT_RETRY_AFTER`].
pub fn parse_retry_after(value: Option<&str>) -> Duration {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use assert_matches::assert_matches;

    use super::*;
    use crate::retry::{RetryConfig, RetryPolicy};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(20)).unwrap()
    }

    #[test]
    fn retry_after_seconds() {
        assert_eq!(parse_retry_after(Some("2")), Duration::from_secs(2));
        assert_eq!(parse_retry_after(Some(" 30 ")), Duration::from_secs(30));
        assert_eq!(parse_retry_after(Some("0")), Duration::ZERO);
    }

    #[test]
    fn retry_after_defaults_to_one_second() {
        assert_eq!(parse_retry_after(None), DEFAULT_RETRY_AFTER);
        assert_eq!(parse_retry_after(Some("")), DEFAULT_RETRY_AFTER);
        assert_eq!(
            parse_retry_after(Some("Wed, 21 Oct 2015 07:28:00 GMT")),
            DEFAULT_RETRY_AFTER
        );
        assert_eq!(parse_retry_after(Some("-1")), DEFAULT_RETRY_AFTER);
    }

    #[tokio::test]
    async fn success_returns_body_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"info":{"count":1,"next":null},"results":[{"id":1,"name":"Rick"}]}"#;
        let mock = server
            .mock("GET", "/api/character")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let json = fetcher()
            .fetch(&format!("{}/api/character", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(json, serde_json::from_str::<serde_json::Value>(body).unwrap());
    }

    #[tokio::test]
    async fn rate_limit_sleeps_then_signals() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/character")
            .with_status(429)
            .with_header("retry-after", "1")
            .create_async()
            .await;

        let start = Instant::now();
        let err = fetcher()
            .fetch(&format!("{}/api/character", server.url()))
            .await
            .unwrap_err();

        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_matches!(err, SyncError::RateLimited { retry_after } if retry_after == Duration::from_secs(1));
    }

    #[tokio::test]
    async fn rate_limit_delay_precedes_retry_backoff() {
        let mut server = mockito::Server::new_async().await;
        let limited = server
            .mock("GET", "/page/limited")
            .with_status(429)
            .with_header("retry-after", "2")
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("GET", "/page/ok")
            .with_status(200)
            .with_body(r#"{"info":{"next":null},"results":[]}"#)
            .expect(1)
            .create_async()
            .await;

        // First attempt hits the rate-limited endpoint, every later one succeeds.
        let attempts = AtomicUsize::new(0);
        let base = server.url();
        let fetcher = fetcher();
        let policy = RetryPolicy::new(RetryConfig::default());

        let start = Instant::now();
        let json = policy
            .run(|| {
                let path = match attempts.fetch_add(1, Ordering::SeqCst) {
                    0 => "limited",
                    _ => "ok",
                };
                let url = format!("{base}/page/{path}");
                let fetcher = &fetcher;
                async move { fetcher.fetch(&url).await }
            })
            .await
            .unwrap();

        // 2 s Retry-After inside the fetcher, then the 1 s first backoff step.
        assert!(start.elapsed() >= Duration::from_secs(3), "{:?}", start.elapsed());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(json["results"], serde_json::json!([]));
        limited.assert_async().await;
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn rate_limit_without_header_uses_default_delay() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/character")
            .with_status(429)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/api/character", server.url()))
            .await
            .unwrap_err();

        assert_matches!(err, SyncError::RateLimited { retry_after } if retry_after == DEFAULT_RETRY_AFTER);
    }

    #[tokio::test]
    async fn non_success_status_is_http_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/character")
            .with_status(404)
            .with_body(r#"{"error":"There is nothing here"}"#)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/api/character", server.url()))
            .await
            .unwrap_err();

        assert_matches!(err, SyncError::HttpStatus { status: 404 });
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/character")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/api/character", server.url()))
            .await
            .unwrap_err();

        assert_matches!(err, SyncError::Decode(_));
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let err = fetcher()
            .fetch("http://127.0.0.1:1/api/character")
            .await
            .unwrap_err();

        assert_matches!(err, SyncError::Network(_));
    }
}
