//! Core traits for the DDNS updater
//!
//! - [`DnsProvider`]: Publish an address through a DDNS provider API
//! - [`IpSource`]: Discover the current public IP address

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
pub use ip_source::IpSource;
