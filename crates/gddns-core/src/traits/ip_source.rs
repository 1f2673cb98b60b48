// # IP Source Trait
//
// Defines the interface for discovering the caller's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP echo service: `gddns-ip-http` crate
// - Future: router/UPnP queries, platform-specific APIs

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for public IP source implementations
///
/// Implementations must be thread-safe and usable across async tasks. A
/// source performs no caching on behalf of the engine: every call reflects
/// the address as observed right now, and the engine decides what to do
/// with it.
///
/// Implementations must not retry internally; a failed lookup is reported
/// to the caller, which owns the re-check schedule.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Resolve the caller's current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: the current public address
    /// - `Err(Error)`: if the address could not be determined
    async fn current_ipv4(&self) -> Result<Ipv4Addr, crate::Error>;
}
