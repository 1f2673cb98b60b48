// # DNS Provider Trait
//
// Defines the interface for submitting authenticated dynamic DNS update
// requests.
//
// ## Implementations
//
// - Google Domains: `gddns-provider-google` crate
//
// A provider performs exactly one outbound call per invocation and returns
// the raw response body. It never retries, never caches, and never decides
// whether an update was needed; those responsibilities belong to the
// engine.

use async_trait::async_trait;
use std::fmt;
use std::net::Ipv4Addr;

/// A single authenticated update request
///
/// # Invariants
///
/// `username`, `password` and `hostname` are non-empty. `ip` must be set
/// unless `offline` is true, in which case it is ignored and the provider
/// marks the hostname as intentionally unreachable instead.
#[derive(Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Credentials generated for the hostname by the provider
    pub username: String,
    /// Password half of the credentials
    pub password: String,
    /// Fully-qualified hostname to update
    pub hostname: String,
    /// Address to publish; ignored in offline mode
    pub ip: Option<Ipv4Addr>,
    /// Mark the hostname offline instead of pointing it at an address
    pub offline: bool,
}

impl UpdateRequest {
    /// Validate the request fields
    ///
    /// The acquisition layer validates user input first; this is the
    /// defensive check at the core boundary.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.username.is_empty() {
            return Err(crate::Error::config("username cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(crate::Error::config("password cannot be empty"));
        }
        if self.hostname.is_empty() {
            return Err(crate::Error::config("hostname cannot be empty"));
        }
        if !self.offline && self.ip.is_none() {
            return Err(crate::Error::config(
                "an IP address is required unless offline mode is set",
            ));
        }
        Ok(())
    }
}

// The password never appears in Debug output or logs.
impl fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("hostname", &self.hostname)
            .field("ip", &self.ip)
            .field("offline", &self.offline)
            .finish()
    }
}

/// Raw one-line response body returned by the provider
///
/// The body carries a status token (e.g. "good", "nochg", "badauth"),
/// optionally followed by the accepted IP. An empty body is a valid, if
/// degenerate, response; it decodes to an unknown outcome rather than an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResponse {
    body: String,
}

impl UpdateResponse {
    /// Wrap a raw response body
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// The raw response text
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Whether the provider returned an empty body
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Submit one update request and return the raw response body
    ///
    /// Exactly one outbound network call per invocation. Connection
    /// failures and timeouts surface as `Error::Network` and are
    /// propagated unmodified; retry policy belongs to the caller.
    ///
    /// # Parameters
    ///
    /// - `request`: the validated update request
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateResponse)`: the raw response body (possibly empty)
    /// - `Err(Error)`: if the request could not be delivered
    async fn submit_update(&self, request: &UpdateRequest) -> Result<UpdateResponse, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UpdateRequest {
        UpdateRequest {
            username: "u".to_string(),
            password: "p".to_string(),
            hostname: "h.example.com".to_string(),
            ip: Some(Ipv4Addr::new(1, 2, 3, 4)),
            offline: false,
        }
    }

    #[test]
    fn valid_request_passes() {
        request().validate().expect("request is valid");
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut r = request();
        r.username = String::new();
        assert!(r.validate().is_err());

        let mut r = request();
        r.password = String::new();
        assert!(r.validate().is_err());

        let mut r = request();
        r.hostname = String::new();
        assert!(r.validate().is_err());
    }

    #[test]
    fn online_request_requires_ip() {
        let mut r = request();
        r.ip = None;
        assert!(r.validate().is_err());
    }

    #[test]
    fn offline_request_needs_no_ip() {
        let mut r = request();
        r.ip = None;
        r.offline = true;
        r.validate().expect("offline request needs no IP");
    }

    #[test]
    fn debug_output_redacts_password() {
        let mut r = request();
        r.password = "s3cret-value".to_string();
        let debug = format!("{r:?}");
        assert!(!debug.contains("s3cret-value"));
        assert!(debug.contains("<REDACTED>"));
    }
}
