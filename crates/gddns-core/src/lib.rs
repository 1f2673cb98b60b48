// # gddns-core
//
// Core library for the gddns dynamic DNS update client.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping a dynamic DNS
// hostname pointed at the caller's current public IPv4 address:
// - **IpSource**: Trait for discovering the current public address
// - **DnsProvider**: Trait for submitting authenticated update requests
// - **Outcome**: Decoding of the provider's plain-text response tokens
// - **UpdateEngine**: One-shot update cycle and the periodic re-check loop
//
// ## Design Principles
//
// 1. **Separation of Concerns**: the engine owns all decision logic;
//    implementations perform single-shot I/O and nothing else
// 2. **No Hidden Retries**: the fixed re-check cadence is the only retry
//    policy anywhere in the system
// 3. **Library-First**: the binary is a thin acquisition layer; everything
//    here is usable (and tested) without a process boundary
// 4. **Session-Scoped State**: the last submitted address lives in memory
//    for one process lifetime; nothing is persisted across runs

pub mod config;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{AccountConfig, EngineConfig, UpdaterConfig};
pub use engine::{EngineEvent, UpdateEngine};
pub use error::{Error, Result};
pub use outcome::{interpret, Action, Outcome};
pub use state::SessionState;
pub use traits::{DnsProvider, IpSource, UpdateRequest, UpdateResponse};
