// # DNS Provider Trait
//
// Defines the contract every dynamic-DNS service adapter satisfies.
//
// ## Implementations
//
// - Dynu: `ddns-provider-dynu` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let published = provider
//         .update(std::net::IpAddr::from([203, 0, 113, 5]))
//         .await?;
//     println!("{} now points at {}", provider.build_domain_name(), published);
//
//     Ok(())
// }
// ```

use crate::config::{IpVersion, ProviderSettings};
use crate::error::{ConfigError, UpdateError};
use crate::util;
use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for DNS provider adapters
///
/// An adapter owns its validated, immutable settings (credentials, domain,
/// host, address family policy, provider flags). Instances are read-only
/// after construction and shared freely across tasks.
///
/// # Update contract
///
/// [`DnsProvider::update`] performs exactly one outbound HTTP request and
/// classifies the answer, in this order:
///
/// 1. Transport failure → [`UpdateError::Network`]
/// 2. Non-2xx status → [`UpdateError::BadStatus`]
/// 3. Authentication marker → [`UpdateError::Auth`]
/// 4. Unknown hostname marker → [`UpdateError::UnknownHost`]
/// 5. Abuse marker → [`UpdateError::Abuse`]
/// 6. Updated / unchanged marker → `Ok(requested_ip)`
/// 7. Anything else → [`UpdateError::UnknownResponse`]
///
/// Steps 2 to 7 are implemented by [`crate::classify::classify_response`]
/// given the adapter's marker table.
///
/// ## Forbidden
/// - ❌ Retrying or backing off (owned by the caller's scheduler)
/// - ❌ Mutating state between calls
/// - ❌ Logging credentials
///
/// Cancellation: dropping the returned future aborts the in-flight request.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Publish `ip` for this record
    ///
    /// Returns the published address. This is the requested address, even
    /// when the provider inferred the address itself or echoed nothing back.
    async fn update(&self, ip: IpAddr) -> Result<IpAddr, UpdateError>;

    /// Registrable domain of the record
    fn domain(&self) -> &str;

    /// Host label, `@` for the root
    fn host(&self) -> &str;

    /// Address family policy of the record
    fn ip_version(&self) -> IpVersion;

    /// Short provider identifier (e.g., "dynu")
    fn provider_name(&self) -> &'static str;

    /// Provider home page, for display
    fn provider_url(&self) -> &'static str;

    /// Fully-qualified hostname of the record
    fn build_domain_name(&self) -> String {
        util::build_domain_name(self.host(), self.domain())
    }

    /// One-line description for logs and status output
    fn summary(&self) -> String {
        util::describe(
            self.domain(),
            self.host(),
            self.provider_name(),
            self.ip_version(),
        )
    }
}

/// Builds a provider from untyped record settings
///
/// Implementations validate the settings fully and never perform network
/// I/O.
pub trait DnsProviderFactory: Send + Sync {
    fn create(&self, settings: &ProviderSettings) -> Result<Box<dyn DnsProvider>, ConfigError>;
}
