//! Configuration types for the update client
//!
//! This module defines all configuration structures used throughout the
//! crate. The acquisition layer (CLI arguments, prompts, environment)
//! produces an [`UpdaterConfig`]; the engine validates it once at
//! construction time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Account settings for the managed hostname
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Username generated for the hostname by the provider
    pub username: String,

    /// Password generated for the hostname by the provider
    pub password: String,

    /// Fully-qualified hostname to keep updated
    pub hostname: String,
}

impl AccountConfig {
    /// Validate the account settings
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
        Ok(())
    }
}

// The password never appears in Debug output or logs.
impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("hostname", &self.hostname)
            .finish()
    }
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Interval between re-checks in periodic mode (in seconds)
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// Capacity of the internal event channel
    ///
    /// When full, new engine events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.check_interval_secs == 0 {
            return Err(crate::Error::config("check interval must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_check_interval_secs() -> u64 {
    // one check per day
    24 * 60 * 60
}

fn default_event_channel_capacity() -> usize {
    256
}

/// Main updater configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Account settings for the managed hostname
    pub account: AccountConfig,

    /// Explicit address to publish; `None` means auto-detect
    #[serde(default)]
    pub ip: Option<Ipv4Addr>,

    /// Mark the hostname offline instead of publishing an address
    #[serde(default)]
    pub offline: bool,

    /// Engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl UpdaterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.account.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}
