//! Decoding of the provider's plain-text response tokens
//!
//! The update endpoint answers with an unstructured one-line body meant
//! for shell-script consumption: a status token, optionally followed by
//! the accepted IP (e.g. `good 203.0.113.5`). Decoding is therefore a
//! substring check against an ordered token table, never whole-string
//! equality, so trailing data after the token does not break matching.

use crate::traits::UpdateResponse;

/// Recommended follow-up for a decoded outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep going; the condition is benign or transient
    Continue,
    /// Report and terminate; retrying with the same request cannot help
    FatalExit,
}

/// Decoded semantic result of an update attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The record was updated
    Success,
    /// The record already had the submitted address
    NoChange,
    /// The hostname does not exist or has no dynamic DNS configured
    HostError,
    /// The credentials are not valid for the hostname
    AuthError,
    /// The hostname is not a fully-qualified domain name
    BadHostnameFormat,
    /// The request was malformed (typically a missing User-Agent)
    BadClientRequest,
    /// The hostname is blocked for repeated protocol violations
    Abused,
    /// The provider reported an internal problem
    ProviderOverloaded,
    /// A conflicting resource record exists for the hostname
    RecordConflict,
    /// The response carried no recognized token
    Unknown,
}

// Ordered token table; first match wins. The tokens are mutually
// exclusive in practice, but the order is part of the decoding contract.
const RESPONSE_TOKENS: &[(&str, Outcome)] = &[
    ("good", Outcome::Success),
    ("nochg", Outcome::NoChange),
    ("nohost", Outcome::HostError),
    ("badauth", Outcome::AuthError),
    ("notfqdn", Outcome::BadHostnameFormat),
    ("badagent", Outcome::BadClientRequest),
    ("abuse", Outcome::Abused),
    ("911", Outcome::ProviderOverloaded),
    ("conflict", Outcome::RecordConflict),
];

/// Decode a raw response body into an [`Outcome`]
///
/// Pure function of the response text: the same body always decodes to the
/// same outcome. Unrecognized and empty bodies decode to
/// [`Outcome::Unknown`]; nothing panics.
pub fn interpret(response: &UpdateResponse) -> Outcome {
    let body = response.text();
    RESPONSE_TOKENS
        .iter()
        .find(|(token, _)| body.contains(*token))
        .map(|&(_, outcome)| outcome)
        .unwrap_or(Outcome::Unknown)
}

impl Outcome {
    /// The recommended follow-up for this outcome
    pub fn action(self) -> Action {
        match self {
            Outcome::Success | Outcome::NoChange | Outcome::Unknown => Action::Continue,
            Outcome::HostError
            | Outcome::AuthError
            | Outcome::BadHostnameFormat
            | Outcome::BadClientRequest
            | Outcome::Abused
            | Outcome::ProviderOverloaded
            | Outcome::RecordConflict => Action::FatalExit,
        }
    }

    /// Whether this outcome should terminate the process
    pub fn is_fatal(self) -> bool {
        self.action() == Action::FatalExit
    }

    /// Human-readable description, suitable for the reporting channel
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Success => "DNS update successful",
            Outcome::NoChange => {
                "the supplied IP address is already set for this host; \
                 do not attempt another update until the address changes"
            }
            Outcome::HostError => {
                "the hostname does not exist or does not have dynamic DNS enabled"
            }
            Outcome::AuthError => {
                "the username/password combination is not valid for the specified host"
            }
            Outcome::BadHostnameFormat => {
                "the supplied hostname is not a valid fully-qualified domain name"
            }
            Outcome::BadClientRequest => {
                "the client is making bad requests; ensure the User-Agent header is set"
            }
            Outcome::Abused => {
                "dynamic DNS access for this hostname has been blocked due to \
                 earlier failures to interpret provider responses correctly"
            }
            Outcome::ProviderOverloaded => {
                "the provider reported an internal problem; wait 5 minutes before retrying"
            }
            Outcome::RecordConflict => {
                "a custom A resource record conflicts with the update; \
                 delete the conflicting record and try again"
            }
            Outcome::Unknown => "unrecognized response from the provider",
        }
    }
}
