// # HTTP IP Source
//
// This crate resolves the caller's public IPv4 address by asking an HTTP
// echo service: a GET against a well-known endpoint that answers with the
// caller's address as a plain-text body and no markup.
//
// ## Endpoint
//
// The default endpoint is checkip.amazonaws.com. Any service with the
// same plain-text contract works; pass its URL to `with_url`.
//
// ## Failure Behavior
//
// Every failure mode fails the attempt fast: transport errors and
// unexpected HTTP statuses surface as network errors, a body that is not
// a dotted-quad IPv4 surfaces as a protocol error. The source never
// retries; the caller owns the re-check schedule.

use gddns_core::error::{Error, Result};
use gddns_core::traits::IpSource;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default IP echo endpoint
const DEFAULT_ECHO_URL: &str = "http://checkip.amazonaws.com";

/// HTTP timeout for echo requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Public IPv4 source backed by an HTTP echo service
pub struct HttpIpSource {
    /// URL of the echo service
    url: String,

    /// HTTP client (timeout configured at construction)
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source against the default echo service
    pub fn new() -> Self {
        Self::with_url(DEFAULT_ECHO_URL)
    }

    /// Create a source against a specific echo URL
    ///
    /// Useful for tests and for deployments that prefer an alternate
    /// service.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current_ipv4(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("request to {} failed: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::network(format!("failed to read response from {}: {e}", self.url))
        })?;

        let trimmed = body.trim();
        let ip = trimmed.parse::<Ipv4Addr>().map_err(|_| {
            Error::protocol(format!(
                "{} returned a non-IPv4 body: {trimmed:?}",
                self.url
            ))
        })?;

        tracing::debug!("resolved public IPv4 {ip} via {}", self.url);
        Ok(ip)
    }
}
