// # Google Domains DNS Provider
//
// This crate submits dynamic DNS updates to the Google Domains
// `/nic/update` endpoint.
//
// ## Protocol
//
// One authenticated GET per update:
//
// ```http
// GET /nic/update?hostname=sub.example.com&myip=203.0.113.5
// Authorization: Basic <base64(username:password)>
// User-Agent: gddns/<version>
// ```
//
// In offline mode the `myip` parameter is replaced by `offline=yes`,
// which parks the hostname as intentionally unreachable.
//
// The response is a one-line plain-text status token, optionally followed
// by the accepted IP (e.g. `good 203.0.113.5`). The body is returned
// verbatim for any HTTP status: tokens such as `badauth` or `911` may
// ride on an error status, and decoding them is the engine's job.
//
// The endpoint rejects clients without a User-Agent (`badagent`), so the
// header is set on the client itself and goes out with every request.
//
// ## Constraints
//
// - One outbound call per invocation, no internal retries
// - Transport failures surface as network errors, propagated unmodified
// - Credentials never appear in logs

use async_trait::async_trait;
use gddns_core::error::{Error, Result};
use gddns_core::traits::{DnsProvider, UpdateRequest, UpdateResponse};
use std::time::Duration;

/// Google Domains dynamic DNS update endpoint
const GOOGLE_DOMAINS_API_BASE: &str = "https://domains.google.com/nic/update";

/// HTTP timeout for update requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent with every update
const USER_AGENT: &str = concat!("gddns/", env!("CARGO_PKG_VERSION"));

/// Google Domains DNS provider
pub struct GoogleDomainsProvider {
    /// Update endpoint URL
    base_url: String,

    /// HTTP client (timeout and User-Agent configured at construction)
    client: reqwest::Client,
}

impl GoogleDomainsProvider {
    /// Create a provider against the production endpoint
    pub fn new() -> Self {
        Self::with_base_url(GOOGLE_DOMAINS_API_BASE)
    }

    /// Create a provider against a specific endpoint URL
    ///
    /// This constructor is mainly useful for testing purposes.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for GoogleDomainsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsProvider for GoogleDomainsProvider {
    async fn submit_update(&self, request: &UpdateRequest) -> Result<UpdateResponse> {
        request.validate()?;

        let mut params: Vec<(&str, String)> = vec![("hostname", request.hostname.clone())];
        if request.offline {
            // Offline parks the hostname; myip is omitted even when an
            // address is present.
            params.push(("offline", "yes".to_string()));
        } else if let Some(ip) = request.ip {
            params.push(("myip", ip.to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .basic_auth(&request.username, Some(&request.password))
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::network(format!("update request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("update endpoint answered HTTP {status}");
        }

        let body = response.text().await.map_err(|e| {
            Error::provider(
                "googledomains",
                format!("failed to read update response: {e}"),
            )
        })?;

        // The status token rides in the body regardless of HTTP status.
        Ok(UpdateResponse::new(body.trim()))
    }

    fn provider_name(&self) -> &'static str {
        "googledomains"
    }
}
