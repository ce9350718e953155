// # IP Source Trait
//
// Defines the interface for discovering the caller's current public IP
// address.
//
// ## Implementations
//
// - HTTP echo services with round-robin selection: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{IpSource, IpVersion};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let any = source.ip().await?;
//     let v4 = source.ip4().await?;
//     let for_record = source.ip_for(IpVersion::V6).await?;
//
//     Ok(())
// }
// ```

use crate::config::IpVersion;
use crate::error::FetchError;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Trait for public IP discovery
///
/// Implementations must be thread-safe and usable concurrently from many
/// tasks. A call performs at most one network request and never retries;
/// repeated calls may be served by different upstream services.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Public address over whichever family the network path picks
    async fn ip(&self) -> Result<IpAddr, FetchError>;

    /// Public IPv4 address
    async fn ip4(&self) -> Result<Ipv4Addr, FetchError>;

    /// Public IPv6 address
    async fn ip6(&self) -> Result<Ipv6Addr, FetchError>;

    /// Public address matching a record's family policy
    async fn ip_for(&self, version: IpVersion) -> Result<IpAddr, FetchError> {
        match version {
            IpVersion::V4 => self.ip4().await.map(IpAddr::V4),
            IpVersion::V6 => self.ip6().await.map(IpAddr::V6),
            IpVersion::Both => self.ip().await,
        }
    }
}
