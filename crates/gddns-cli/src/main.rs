// # gddns - Google Domains dynamic DNS updater
//
// This binary is a thin integration layer:
// 1. Acquiring the update settings (arguments or interactive prompts)
// 2. Initializing logging and the runtime
// 3. Driving the update engine
//
// All update logic lives in gddns-core; nothing here decides when or what
// to submit.
//
// ## Usage
//
// ```text
// gddns USERNAME PASSWORD HOSTNAME [IP|offline] [offline]
// ```
//
// With no arguments the settings are collected interactively. A 4th or
// 5th argument equal to `offline` (case-insensitive) parks the hostname
// instead of pointing it at an address; otherwise the 4th argument is the
// explicit IPv4 to publish. Omit it to auto-detect the current public
// address.
//
// After a non-fatal first update the user is asked whether to keep the
// process running and re-check for address changes on a fixed cadence.
//
// ## Environment
//
// - `GDDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `GDDNS_IP_ECHO_URL`: alternate IP echo service URL
// - `GDDNS_CHECK_INTERVAL_HOURS`: re-check cadence in periodic mode
//   (default: 24)

use anyhow::Result;
use gddns_core::{Action, AccountConfig, EngineConfig, UpdateEngine, UpdaterConfig};
use gddns_ip_http::HttpIpSource;
use gddns_provider_google::GoogleDomainsProvider;
use std::env;
use std::io::{self, BufRead, Write};
use std::net::Ipv4Addr;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "usage: gddns USERNAME PASSWORD HOSTNAME [IP|offline] [offline]";

const DEFAULT_CHECK_INTERVAL_HOURS: u64 = 24;

/// Exit codes for the different termination scenarios
///
/// Fatal provider outcomes (bad credentials, unknown host, ...) exit 0
/// after the message has been reported; that convention predates this
/// implementation and scripts depend on it. Network and configuration
/// failures exit 1.
#[derive(Debug, Clone, Copy)]
enum UpdaterExitCode {
    /// Normal completion, including reported fatal outcomes
    Clean = 0,
    /// Configuration/usage error or network failure
    Failure = 1,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Settings acquired from arguments or prompts
struct Acquired {
    account: AccountConfig,
    ip: Option<Ipv4Addr>,
    offline: bool,
}

impl Acquired {
    /// Build settings from positional arguments (3 to 5 of them)
    fn from_args(args: &[String]) -> Result<Self> {
        let account = AccountConfig {
            username: args[0].clone(),
            password: args[1].clone(),
            hostname: args[2].clone(),
        };

        let mut ip = None;
        let mut offline = false;
        for arg in &args[3..] {
            if arg.eq_ignore_ascii_case("offline") {
                offline = true;
            } else {
                ip = Some(
                    arg.parse()
                        .map_err(|_| anyhow::anyhow!("'{arg}' is not a valid IPv4 address"))?,
                );
            }
        }

        Ok(Self {
            account,
            ip,
            offline,
        })
    }

    /// Collect settings interactively from stdin
    fn from_prompts() -> Result<Self> {
        println!("gddns {}", env!("CARGO_PKG_VERSION"));
        println!("Google Domains dynamic DNS updater");
        println!("----------------------------------");
        println!();
        println!("Please provide the settings for the dynamic DNS update");

        let username = prompt("Username: ")?;
        let password = prompt("Password: ")?;
        let hostname = prompt("Hostname: ")?;

        let ip_raw = prompt("IP (leave blank to auto-detect): ")?;
        let ip = if ip_raw.is_empty() {
            None
        } else {
            Some(
                ip_raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("'{ip_raw}' is not a valid IPv4 address"))?,
            )
        };

        let offline = loop {
            let answer = prompt("Offline mode (yes/no): ")?;
            if answer.eq_ignore_ascii_case("yes") {
                break true;
            }
            if answer.eq_ignore_ascii_case("no") {
                break false;
            }
        };

        Ok(Self {
            account: AccountConfig {
                username,
                password,
                hostname,
            },
            ip,
            offline,
        })
    }

    /// Validate the acquired settings before they reach the engine
    fn validate(&self) -> Result<()> {
        if self.account.username.is_empty() {
            anyhow::bail!("username cannot be empty");
        }
        if self.account.password.is_empty() {
            anyhow::bail!("password cannot be empty");
        }
        validate_hostname(&self.account.hostname)
    }
}

/// Validate that a string is a usable DNS hostname
///
/// Basic RFC 1035 label validation; the provider performs the
/// authoritative check (`notfqdn`), this just catches typos early.
fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        anyhow::bail!("hostname cannot be empty");
    }

    if hostname.len() > 253 {
        anyhow::bail!(
            "hostname too long: {} chars (max 253). Got: {}",
            hostname.len(),
            hostname
        );
    }

    for label in hostname.split('.') {
        if label.is_empty() {
            anyhow::bail!("hostname has an empty label: '{}'", hostname);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "hostname label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            anyhow::bail!(
                "hostname label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "hostname label cannot start or end with a hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

/// Print a label and read one trimmed line from stdin
fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        anyhow::bail!("unexpected end of input");
    }

    Ok(line.trim().to_string())
}

/// Interpret a yes/no answer; anything but "yes" counts as no
fn yes_no(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Read the periodic-mode cadence from the environment
fn check_interval_hours() -> Result<u64> {
    match env::var("GDDNS_CHECK_INTERVAL_HOURS") {
        Ok(raw) => {
            let hours: u64 = raw.parse().map_err(|_| {
                anyhow::anyhow!(
                    "GDDNS_CHECK_INTERVAL_HOURS must be a positive integer. Got: {raw}"
                )
            })?;

            if !(1..=720).contains(&hours) {
                anyhow::bail!(
                    "GDDNS_CHECK_INTERVAL_HOURS must be between 1 and 720. Got: {hours}"
                );
            }

            Ok(hours)
        }
        Err(_) => Ok(DEFAULT_CHECK_INTERVAL_HOURS),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    // Acquire settings from arguments or prompts
    let acquired = match args.len() {
        0 => Acquired::from_prompts(),
        1 | 2 => {
            eprintln!("required arguments not given");
            eprintln!("{USAGE}");
            return UpdaterExitCode::Failure.into();
        }
        3..=5 => Acquired::from_args(&args),
        _ => {
            eprintln!("too many arguments");
            eprintln!("{USAGE}");
            return UpdaterExitCode::Failure.into();
        }
    };

    let acquired = match acquired {
        Ok(acquired) => acquired,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return UpdaterExitCode::Failure.into();
        }
    };

    if let Err(e) = acquired.validate() {
        eprintln!("{e}");
        return UpdaterExitCode::Failure.into();
    }

    // Initialize tracing
    let log_level = match env::var("GDDNS_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
        return UpdaterExitCode::Failure.into();
    }

    let interval_hours = match check_interval_hours() {
        Ok(hours) => hours,
        Err(e) => {
            error!("{e}");
            return UpdaterExitCode::Failure.into();
        }
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return UpdaterExitCode::Failure.into();
        }
    };

    rt.block_on(run_updater(acquired, interval_hours)).into()
}

/// Wire up the engine and drive it: one update, then optionally the
/// periodic loop
async fn run_updater(acquired: Acquired, interval_hours: u64) -> UpdaterExitCode {
    let ip_source: Box<dyn gddns_core::IpSource> = match env::var("GDDNS_IP_ECHO_URL") {
        Ok(url) => Box::new(HttpIpSource::with_url(url)),
        Err(_) => Box::new(HttpIpSource::new()),
    };
    let provider = Box::new(GoogleDomainsProvider::new());

    let config = UpdaterConfig {
        account: acquired.account,
        ip: acquired.ip,
        offline: acquired.offline,
        engine: EngineConfig {
            check_interval_secs: interval_hours * 60 * 60,
            ..EngineConfig::default()
        },
    };

    let (mut engine, _events) = match UpdateEngine::new(ip_source, provider, config) {
        Ok(parts) => parts,
        Err(e) => {
            error!("{e}");
            return UpdaterExitCode::Failure;
        }
    };

    let outcome = match engine.run_once().await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("update failed: {e}");
            return UpdaterExitCode::Failure;
        }
    };

    // Fatal outcomes have already been reported; exit clean for scripts.
    if outcome.action() == Action::FatalExit {
        return UpdaterExitCode::Clean;
    }

    if !ask_periodic_mode(interval_hours) {
        return UpdaterExitCode::Clean;
    }

    info!("entering periodic mode, re-checking every {interval_hours} hour(s)");
    match engine.run().await {
        Ok(()) => UpdaterExitCode::Clean,
        Err(e) => {
            error!("periodic update loop failed: {e}");
            UpdaterExitCode::Failure
        }
    }
}

/// Ask whether to keep running and re-check on the configured cadence
///
/// End of input (piped usage) counts as no.
fn ask_periodic_mode(interval_hours: u64) -> bool {
    print!("Check for IP change every {interval_hours} hour(s) and update? (yes/no): ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => false,
        Ok(_) => yes_no(&line),
    }
}
