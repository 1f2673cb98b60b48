//! Core update engine
//!
//! The UpdateEngine is responsible for:
//! - Resolving the current public IPv4 via IpSource (when needed)
//! - Submitting authenticated updates via DnsProvider
//! - Decoding the provider's response into an Outcome
//! - Tracking the last submitted address for idempotent loop cycles
//!
//! ## Flow
//!
//! ```text
//! ┌────────────┐   current_ipv4()   ┌───────────────┐
//! │  IpSource  │───────────────────▶│ UpdateEngine  │
//! └────────────┘                    └───────────────┘
//!                                      │         │
//!                      submit_update() │         │ interpret()
//!                                      ▼         ▼
//!                               ┌─────────────┐ ┌──────────┐
//!                               │ DnsProvider │ │ Outcome  │
//!                               └─────────────┘ └──────────┘
//! ```
//!
//! One-shot mode (`run_once`) performs a single resolve-submit-decode
//! cycle. Periodic mode (`run`) then sleeps the full check interval,
//! re-resolves, and submits only when the address differs from the last
//! known one. A FatalExit outcome terminates the loop; everything else is
//! reported and the loop continues.

use crate::config::{AccountConfig, UpdaterConfig};
use crate::error::Result;
use crate::outcome::{self, Action, Outcome};
use crate::state::SessionState;
use crate::traits::{DnsProvider, IpSource, UpdateRequest};
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the UpdateEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Periodic mode started
    Started {
        hostname: String,
    },

    /// A new public address was observed
    IpResolved {
        ip: Ipv4Addr,
        previous: Option<Ipv4Addr>,
    },

    /// Resolution failed; the cycle was skipped
    ResolveFailed {
        reason: String,
    },

    /// The address is unchanged; no update submitted this cycle
    UpdateSkipped {
        ip: Ipv4Addr,
    },

    /// An update was submitted and its response decoded
    UpdateSubmitted {
        hostname: String,
        outcome: Outcome,
    },

    /// An update could not be delivered
    UpdateFailed {
        reason: String,
    },

    /// Periodic mode stopped
    Stopped {
        reason: String,
    },
}

/// Whether the periodic loop should keep running after a cycle
enum LoopControl {
    Continue,
    Terminate,
}

/// Core update engine
///
/// ## Lifecycle
///
/// 1. Create with [`UpdateEngine::new()`]
/// 2. Submit once with [`UpdateEngine::run_once()`]
/// 3. Optionally enter periodic mode with [`UpdateEngine::run()`]
/// 4. Periodic mode runs until a fatal outcome or a shutdown signal
///
/// ## Concurrency
///
/// The engine is a single logical task: one network call is in flight at a
/// time and the loop blocks on a single cooperative sleep point between
/// cycles. Session state is owned by the engine and mutated in place; no
/// locking is involved.
pub struct UpdateEngine {
    /// IP source for public address discovery
    ip_source: Box<dyn IpSource>,

    /// DNS provider for submitting updates
    provider: Box<dyn DnsProvider>,

    /// Account settings for the managed hostname
    account: AccountConfig,

    /// Explicit address supplied by the caller, if any
    explicit_ip: Option<Ipv4Addr>,

    /// Offline mode: mark the hostname unreachable instead of publishing
    offline: bool,

    /// Interval between re-checks in periodic mode
    check_interval: Duration,

    /// Last known address for this session
    session: SessionState,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl UpdateEngine {
    /// Create a new update engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: updater configuration (validated here)
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields
    /// engine events
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: UpdaterConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            ip_source,
            provider,
            account: config.account,
            explicit_ip: config.ip,
            offline: config.offline,
            check_interval: Duration::from_secs(config.engine.check_interval_secs),
            session: SessionState::new(),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Override the re-check interval
    ///
    /// Callers that need a cadence other than the configured one (tests in
    /// particular) can shorten the interval without touching the config.
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// The last address recorded in this session
    pub fn last_ip(&self) -> Option<Ipv4Addr> {
        self.session.last_ip()
    }

    /// Perform a single update cycle
    ///
    /// Resolves the public address if no explicit one is available (a
    /// resolution failure here is an error: at startup there is nothing to
    /// fall back on), submits the update, decodes and reports the outcome,
    /// and records the submitted address.
    ///
    /// # Returns
    ///
    /// - `Ok(Outcome)`: the decoded outcome; the caller maps its
    ///   [`Action`] to process termination
    /// - `Err(Error)`: resolution or submission failed
    pub async fn run_once(&mut self) -> Result<Outcome> {
        let ip = if self.offline {
            None
        } else {
            Some(self.target_ip().await?)
        };

        let request = self.build_request(ip);
        let outcome = self.submit(&request).await?;

        if let Some(ip) = ip {
            self.session.record(ip);
        }

        Ok(outcome)
    }

    /// Run the periodic update loop
    ///
    /// Sleeps the full check interval between cycles, re-resolves the
    /// public address, and submits only when it changed. Runs until a
    /// fatal outcome or SIGINT/Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the periodic loop with a controlled shutdown signal
    ///
    /// Passing `Some(receiver)` replaces the OS signal handler with a
    /// oneshot channel, which lets tests stop the loop deterministically.
    /// Production callers should use [`UpdateEngine::run()`] instead.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.emit_event(EngineEvent::Started {
            hostname: self.account.hostname.clone(),
        });
        info!(
            "watching for IP changes every {} second(s)",
            self.check_interval.as_secs()
        );

        if let Some(mut rx) = shutdown_rx {
            // Test mode: wait for the provided shutdown signal
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(self.check_interval) => {
                        if let LoopControl::Terminate = self.cycle().await {
                            break;
                        }
                    }

                    _ = &mut rx => {
                        info!("shutdown signal received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        } else {
            // Production mode: wait for SIGINT/Ctrl-C
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(self.check_interval) => {
                        if let LoopControl::Terminate = self.cycle().await {
                            break;
                        }
                    }

                    _ = tokio::signal::ctrl_c() => {
                        info!("shutdown signal received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// One periodic cycle: resolve, compare, maybe submit
    async fn cycle(&mut self) -> LoopControl {
        let ip = match self.ip_source.current_ipv4().await {
            Ok(ip) => ip,
            Err(e) => {
                // A transient echo-service outage must not bring the loop
                // down; the next cycle retries on schedule.
                warn!("could not resolve public IP, skipping this cycle: {e}");
                self.emit_event(EngineEvent::ResolveFailed {
                    reason: e.to_string(),
                });
                return LoopControl::Continue;
            }
        };

        if self.session.is_current(ip) {
            debug!("public IP {ip} unchanged, no update needed");
            self.emit_event(EngineEvent::UpdateSkipped { ip });
            return LoopControl::Continue;
        }

        let previous = self.session.last_ip();
        info!(
            "public IP changed: {} -> {ip}",
            previous.map_or_else(|| "unknown".to_string(), |p| p.to_string())
        );
        self.emit_event(EngineEvent::IpResolved { ip, previous });
        self.session.record(ip);

        let request = self.build_request(Some(ip));
        match self.submit(&request).await {
            Ok(outcome) if outcome.is_fatal() => {
                self.emit_event(EngineEvent::Stopped {
                    reason: outcome.message().to_string(),
                });
                LoopControl::Terminate
            }
            Ok(_) => LoopControl::Continue,
            Err(e) => {
                error!(
                    "update submission via {} failed: {e}",
                    self.provider.provider_name()
                );
                self.emit_event(EngineEvent::UpdateFailed {
                    reason: e.to_string(),
                });
                LoopControl::Continue
            }
        }
    }

    /// Resolve the address to publish for a one-shot cycle
    async fn target_ip(&mut self) -> Result<Ipv4Addr> {
        if let Some(ip) = self.explicit_ip {
            return Ok(ip);
        }
        if let Some(ip) = self.session.last_ip() {
            return Ok(ip);
        }

        info!("resolving current public IPv4 address");
        let ip = self.ip_source.current_ipv4().await?;
        info!("public IPv4 is {ip}");
        Ok(ip)
    }

    fn build_request(&self, ip: Option<Ipv4Addr>) -> UpdateRequest {
        UpdateRequest {
            username: self.account.username.clone(),
            password: self.account.password.clone(),
            hostname: self.account.hostname.clone(),
            ip,
            offline: self.offline,
        }
    }

    /// Submit one request, decode and report its outcome
    ///
    /// Network errors propagate unmodified; retry policy belongs to the
    /// caller.
    async fn submit(&self, request: &UpdateRequest) -> Result<Outcome> {
        request.validate()?;

        match (request.offline, request.ip) {
            (true, _) => info!("setting {} offline", request.hostname),
            (false, Some(ip)) => info!("setting {} to {ip}", request.hostname),
            (false, None) => {}
        }

        let response = self.provider.submit_update(request).await?;

        if response.is_empty() {
            warn!("no response from server");
        } else {
            info!("server response: {}", response.text());
        }

        let outcome = outcome::interpret(&response);
        match outcome.action() {
            Action::Continue => info!("{}", outcome.message()),
            Action::FatalExit => error!("{}", outcome.message()),
        }

        self.emit_event(EngineEvent::UpdateSubmitted {
            hostname: request.hostname.clone(),
            outcome,
        });

        Ok(outcome)
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("event channel full or closed, dropping engine event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_events_are_comparable() {
        let event = EngineEvent::IpResolved {
            ip: Ipv4Addr::new(1, 2, 3, 4),
            previous: None,
        };

        assert_eq!(event.clone(), event);
    }
}
