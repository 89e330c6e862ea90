//! `reqwest`-backed HTTP client.

use std::error::Error as _;

use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;

use super::FetchFailure;
use super::FetchedPayload;
use super::HttpClient;

const USER_AGENT: &str = concat!("imgpack/", env!("CARGO_PKG_VERSION"));

/// Production HTTP client.
///
/// Keeps no cookie store and sends no credentials. Redirects follow
/// `reqwest`'s default policy. No timeout is configured; callers that need
/// one wrap the extraction future.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Wraps an already configured `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, accept: &str) -> Result<FetchedPayload, FetchFailure> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(describe(&e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchFailure::Transport(describe(&e)))?;

        Ok(FetchedPayload {
            status,
            content_type,
            body,
        })
    }
}

/// Flattens a `reqwest` error and its sources into one line.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(ReqwestClient::new().is_ok());
    }

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("imgpack/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let client = ReqwestClient::new().unwrap();
        // Port 9 on localhost: nothing listens there in a test environment
        let result = client
            .get("http://127.0.0.1:9/archive.zip", "application/zip")
            .await;
        assert!(matches!(result, Err(FetchFailure::Transport(_))));
    }
}
