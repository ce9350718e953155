// # ddns-update
//
// Thin integration layer: publish the current public IP address for every
// configured record, once, then exit.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering providers and building one adapter per record
// 4. Fetching the public address once per required family and calling
//    `update` once per record
//
// Scheduling (running this periodically) and remembering the last published
// address are left to the caller, e.g. a systemd timer or cron.
//
// ## Configuration
//
// - `DDNS_CONFIG`: Inline JSON document `{"settings": [...]}`
// - `DDNS_CONFIG_PATH`: Path to the same JSON document (used when
//   `DDNS_CONFIG` is unset)
// - `DDNS_ECHO_TIMEOUT_SECS`: Deadline for each public IP lookup (default 10)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn or error (default info)
//
// ## Example
//
// ```bash
// export DDNS_CONFIG='{"settings": [{"provider": "dynu", "domain": "example.com",
//   "host": "www", "ip_version": "ipv4", "username": "me", "password": "secret"}]}'
//
// ddns-update
// ```

use anyhow::{Context, Result};
use ddns_core::{DnsProvider, FetchError, IpSource, IpVersion, ProviderRegistry, UpdaterConfig};
use ddns_ip_http::{Fetcher, FetcherSettings};
use std::collections::HashMap;
use std::env;
use std::net::IpAddr;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_ECHO_TIMEOUT_SECS: u64 = 10;

/// Exit codes
///
/// - 0: Every record updated
/// - 1: Configuration or startup error
/// - 2: At least one lookup or update failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateExitCode {
    Success = 0,
    ConfigError = 1,
    UpdateFailed = 2,
}

impl From<UpdateExitCode> for ExitCode {
    fn from(code: UpdateExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    updater: UpdaterConfig,
    echo_timeout: Duration,
    log_level: Level,
}

impl Config {
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from a variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let json = match (lookup("DDNS_CONFIG"), lookup("DDNS_CONFIG_PATH")) {
            (Some(inline), _) if !inline.trim().is_empty() => inline,
            (_, Some(path)) if !path.trim().is_empty() => std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read DDNS_CONFIG_PATH {path}"))?,
            _ => anyhow::bail!(
                "DDNS_CONFIG or DDNS_CONFIG_PATH is required. \
                Set it via: export DDNS_CONFIG='{{\"settings\": [...]}}'"
            ),
        };

        let updater = UpdaterConfig::from_json(&json).context("invalid DDNS configuration")?;
        updater.validate().context("invalid DDNS configuration")?;

        let echo_timeout_secs = match lookup("DDNS_ECHO_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| (1..=300).contains(secs))
                .with_context(|| {
                    format!("DDNS_ECHO_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {raw}")
                })?,
            None => DEFAULT_ECHO_TIMEOUT_SECS,
        };

        let log_level = match lookup("DDNS_LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            other => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        };

        Ok(Self {
            updater,
            echo_timeout: Duration::from_secs(echo_timeout_secs),
            log_level,
        })
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return UpdateExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return UpdateExitCode::ConfigError.into();
    }

    info!(
        "Configuration loaded: {} record(s)",
        config.updater.settings.len()
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return UpdateExitCode::ConfigError.into();
        }
    };

    rt.block_on(run_once(config)).into()
}

/// Build every component, then publish each record once
async fn run_once(config: Config) -> UpdateExitCode {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "dynu")]
    ddns_provider_dynu::register(&registry);

    let providers: Vec<Box<dyn DnsProvider>> = match config
        .updater
        .settings
        .iter()
        .map(|settings| registry.create_provider(settings))
        .collect()
    {
        Ok(providers) => providers,
        Err(e) => {
            error!(kind = ?e.kind(), "Invalid record settings: {}", e);
            return UpdateExitCode::ConfigError;
        }
    };

    let fetcher = match Fetcher::new(FetcherSettings::default().with_timeout(config.echo_timeout)) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to build public IP fetcher: {}", e);
            return UpdateExitCode::ConfigError;
        }
    };

    let failures = update_all(&providers, &fetcher).await;
    if failures == 0 {
        info!("All {} record(s) up to date", providers.len());
        UpdateExitCode::Success
    } else {
        warn!("{} of {} record(s) failed", failures, providers.len());
        UpdateExitCode::UpdateFailed
    }
}

/// Publish every record; returns the number of failed records
///
/// The public address is looked up at most once per family policy, so
/// records sharing a policy publish the same address.
async fn update_all(providers: &[Box<dyn DnsProvider>], source: &dyn IpSource) -> usize {
    let mut addresses: HashMap<IpVersion, Result<IpAddr, String>> = HashMap::new();
    let mut failures = 0;

    for provider in providers {
        let version = provider.ip_version();
        if !addresses.contains_key(&version) {
            let lookup = source
                .ip_for(version)
                .await
                .map_err(|e: FetchError| e.to_string());
            addresses.insert(version, lookup);
        }

        let ip = match &addresses[&version] {
            Ok(ip) => *ip,
            Err(e) => {
                error!("Skipping {}: no public {} address: {}", provider.summary(), version, e);
                failures += 1;
                continue;
            }
        };

        match provider.update(ip).await {
            Ok(published) => info!("{} -> {}", provider.summary(), published),
            Err(e) => {
                error!(
                    kind = ?e.kind(),
                    retryable = e.kind().is_retryable(),
                    "Update failed for {}: {}",
                    provider.summary(),
                    e
                );
                failures += 1;
            }
        }
    }

    failures
}
