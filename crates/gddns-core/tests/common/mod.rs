//! Test doubles and common utilities for the engine contract tests
//!
//! The doubles are scripted rather than mocked: each one replays a fixed
//! sequence of results (repeating the final entry forever) and counts how
//! often it was called.

use gddns_core::config::{AccountConfig, EngineConfig, UpdaterConfig};
use gddns_core::error::{Error, Result};
use gddns_core::traits::{DnsProvider, IpSource, UpdateRequest, UpdateResponse};
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A scripted IP source
///
/// Replays the queued results in order; once a single entry remains it is
/// returned for every subsequent call. `Err` entries carry the message of
/// the network error to produce.
pub struct ScriptedIpSource {
    script: Arc<Mutex<VecDeque<std::result::Result<Ipv4Addr, String>>>>,
    resolve_call_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    pub fn new(script: Vec<std::result::Result<Ipv4Addr, String>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current_ipv4() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }

    /// Create a new ScriptedIpSource that shares script and counters with
    /// an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            script: Arc::clone(&other.script),
            resolve_call_count: Arc::clone(&other.resolve_call_count),
        }
    }

    fn next(&self) -> std::result::Result<Ipv4Addr, String> {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script
                .front()
                .cloned()
                .expect("scripted IP source needs at least one entry")
        }
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current_ipv4(&self) -> Result<Ipv4Addr> {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        self.next().map_err(Error::network)
    }
}

/// A scripted DNS provider
///
/// Records every submitted request and replays the queued replies in
/// order, repeating the final entry forever. `Err` entries carry the
/// message of the network error to produce.
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    submit_call_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<UpdateRequest>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            submit_call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that answers every submission with the same body
    pub fn always(body: &str) -> Self {
        Self::new(vec![Ok(body.to_string())])
    }

    /// Get the number of times submit_update() was called
    pub fn submit_call_count(&self) -> usize {
        self.submit_call_count.load(Ordering::SeqCst)
    }

    /// Get the recorded requests, in submission order
    pub fn submitted_requests(&self) -> Vec<UpdateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Create a new ScriptedProvider that shares replies and counters with
    /// an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            replies: Arc::clone(&other.replies),
            submit_call_count: Arc::clone(&other.submit_call_count),
            requests: Arc::clone(&other.requests),
        }
    }

    fn next(&self) -> std::result::Result<String, String> {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies
                .front()
                .cloned()
                .expect("scripted provider needs at least one reply")
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for ScriptedProvider {
    async fn submit_update(&self, request: &UpdateRequest) -> Result<UpdateResponse> {
        self.submit_call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.next().map(UpdateResponse::new).map_err(Error::network)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Helper to create a minimal UpdaterConfig for testing
pub fn test_config(hostname: &str) -> UpdaterConfig {
    UpdaterConfig {
        account: AccountConfig {
            username: "u".to_string(),
            password: "p".to_string(),
            hostname: hostname.to_string(),
        },
        ip: None,
        offline: false,
        engine: EngineConfig {
            check_interval_secs: 24 * 60 * 60,
            event_channel_capacity: 64,
        },
    }
}
