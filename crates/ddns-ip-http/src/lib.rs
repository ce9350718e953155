// # HTTP IP Source
//
// This crate discovers the caller's public IP address by asking external
// "what is my IP" echo services over HTTP(S).
//
// ## Architecture
//
// - **EchoSource**: Endpoints and response format of one echo service
// - **EchoClient**: One echo service bound to one transport
//   (system-chosen family, forced IPv4 or forced IPv6)
// - **Ring**: Fixed, ordered pool of clients with an atomic round-robin
//   counter, one ring per mode
// - **Fetcher**: Public entry point; `ip()`, `ip4()` and `ip6()` each pick
//   the next client from their ring and perform a single lookup
//
// Consecutive calls rotate through the services, spreading load and letting
// the caller's next attempt land on a different service after a failure.
// The fetcher itself never retries and spawns no background work.

pub mod client;
pub mod ring;
pub mod source;

pub use client::EchoClient;
pub use ring::Ring;
pub use source::{EchoSource, Endpoints, ResponseFormat};

use async_trait::async_trait;
use ddns_core::{ConfigError, FetchError, IpSource, IpVersion};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

/// Default deadline for one echo lookup
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetcher settings
#[derive(Debug, Clone)]
pub struct FetcherSettings {
    /// Echo services, in rotation order
    pub sources: Vec<EchoSource>,
    /// Deadline applied to every lookup
    pub timeout: Duration,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            sources: EchoSource::defaults(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FetcherSettings {
    pub fn with_sources(mut self, sources: Vec<EchoSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Public IP fetcher with one round-robin ring per address family mode
#[derive(Debug)]
pub struct Fetcher {
    any: Ring<EchoClient>,
    v4: Ring<EchoClient>,
    v6: Ring<EchoClient>,
    timeout: Duration,
}

impl Fetcher {
    /// Build the three rings
    ///
    /// Each ring holds, in configured order, every source with an endpoint
    /// for its mode. Fails with [`ConfigError::NoEchoSources`] if any ring
    /// would be empty.
    pub fn new(settings: FetcherSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            any: build_ring(&settings, IpVersion::Both)?,
            v4: build_ring(&settings, IpVersion::V4)?,
            v6: build_ring(&settings, IpVersion::V6)?,
            timeout: settings.timeout,
        })
    }

    /// Fetcher over the built-in echo services
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(FetcherSettings::default())
    }

    /// Ring serving the given mode
    pub fn ring(&self, version: IpVersion) -> &Ring<EchoClient> {
        match version {
            IpVersion::Both => &self.any,
            IpVersion::V4 => &self.v4,
            IpVersion::V6 => &self.v6,
        }
    }

    async fn fetch(&self, version: IpVersion) -> Result<(&EchoClient, IpAddr), FetchError> {
        let client = self.ring(version).next();
        match client.fetch(self.timeout).await {
            Ok(ip) => Ok((client, ip)),
            Err(e) => {
                tracing::warn!(source = %client.name(), kind = ?e.kind(), "Public IP lookup failed: {}", e);
                Err(e)
            }
        }
    }
}

fn build_ring(settings: &FetcherSettings, version: IpVersion) -> Result<Ring<EchoClient>, ConfigError> {
    let transport = client::build_transport(version, settings.timeout)?;
    let clients = settings
        .sources
        .iter()
        .filter_map(|source| EchoClient::new(source, version, transport.clone()))
        .collect();

    Ring::new(clients).ok_or(ConfigError::NoEchoSources(version))
}

#[async_trait]
impl IpSource for Fetcher {
    async fn ip(&self) -> Result<IpAddr, FetchError> {
        self.fetch(IpVersion::Both).await.map(|(_, ip)| ip)
    }

    async fn ip4(&self) -> Result<Ipv4Addr, FetchError> {
        match self.fetch(IpVersion::V4).await? {
            (_, IpAddr::V4(ip)) => Ok(ip),
            (client, got) => Err(mismatch(client, got)),
        }
    }

    async fn ip6(&self) -> Result<Ipv6Addr, FetchError> {
        match self.fetch(IpVersion::V6).await? {
            (_, IpAddr::V6(ip)) => Ok(ip),
            (client, got) => Err(mismatch(client, got)),
        }
    }
}

// Family-constrained clients already reject the other family; this only
// narrows the type.
fn mismatch(client: &EchoClient, got: IpAddr) -> FetchError {
    FetchError::FamilyMismatch {
        source_name: client.name().to_string(),
        expected: client.version(),
        got,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rings() {
        let fetcher = Fetcher::with_defaults().unwrap();
        let count = EchoSource::defaults().len();

        assert_eq!(fetcher.ring(IpVersion::Both).len(), count);
        assert_eq!(fetcher.ring(IpVersion::V4).len(), count);
        assert_eq!(fetcher.ring(IpVersion::V6).len(), count);
    }

    #[test]
    fn test_rings_filtered_by_mode() {
        let v4_only = EchoSource::custom(
            "v4-only",
            Endpoints {
                any: Some("http://127.0.0.1:1/".to_string()),
                v4: Some("http://127.0.0.1:1/".to_string()),
                v6: None,
            },
            ResponseFormat::Plain,
        );
        let settings = FetcherSettings::default()
            .with_sources(vec![v4_only, EchoSource::ipify()]);
        let fetcher = Fetcher::new(settings).unwrap();

        assert_eq!(fetcher.ring(IpVersion::V4).len(), 2);
        let v6: Vec<&str> = fetcher
            .ring(IpVersion::V6)
            .members()
            .iter()
            .map(EchoClient::name)
            .collect();
        assert_eq!(v6, vec!["ipify"]);
    }

    #[test]
    fn test_empty_ring_is_config_error() {
        let v4_only = EchoSource::custom(
            "v4-only",
            Endpoints {
                v4: Some("http://127.0.0.1:1/".to_string()),
                ..Endpoints::default()
            },
            ResponseFormat::Plain,
        );
        let settings = FetcherSettings::default().with_sources(vec![v4_only]);

        assert!(matches!(
            Fetcher::new(settings),
            Err(ConfigError::NoEchoSources(IpVersion::Both))
        ));
    }

    #[test]
    fn test_ring_order_preserved() {
        let fetcher = Fetcher::with_defaults().unwrap();
        let names: Vec<&str> = fetcher
            .ring(IpVersion::Both)
            .members()
            .iter()
            .map(EchoClient::name)
            .collect();

        assert_eq!(names, vec!["ipify", "icanhazip", "cloudflare", "seeip", "ifconfig.co"]);
    }
}
