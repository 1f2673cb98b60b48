//! Core trait definitions
//!
//! The update engine talks to the outside world through these two traits:
//! - [`IpSource`]: public IPv4 discovery
//! - [`DnsProvider`]: submission of authenticated update requests

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{DnsProvider, UpdateRequest, UpdateResponse};
pub use ip_source::IpSource;
