//! Session-scoped update state
//!
//! Tracks the last address submitted during this process's lifetime so the
//! periodic loop can skip cycles where nothing changed. Nothing is
//! persisted: a restart starts from a clean slate and the first cycle
//! always submits.

use std::net::Ipv4Addr;

/// Last known public IPv4 for the managed hostname
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    last_ip: Option<Ipv4Addr>,
}

impl SessionState {
    /// Create an empty session state
    pub fn new() -> Self {
        Self::default()
    }

    /// The last recorded address, if any
    pub fn last_ip(&self) -> Option<Ipv4Addr> {
        self.last_ip
    }

    /// Whether `ip` matches the last recorded address
    pub fn is_current(&self, ip: Ipv4Addr) -> bool {
        self.last_ip == Some(ip)
    }

    /// Record `ip` as the last known address
    pub fn record(&mut self, ip: Ipv4Addr) {
        self.last_ip = Some(ip);
    }
}
