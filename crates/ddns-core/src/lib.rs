// # ddns-core
//
// Core library for the DDNS updater.
//
// ## Architecture Overview
//
// This library holds the contracts shared by every other crate:
// - **DnsProvider**: Trait every DDNS service adapter implements
// - **IpSource**: Trait for public IP discovery (any / IPv4 / IPv6)
// - **classify**: Ordered marker table turning free-text provider answers
//   into a success or a specific error
// - **error**: Closed error taxonomy with programmatic kinds
// - **ProviderRegistry**: Name → factory lookup for building adapters from
//   configuration
//
// ## Design Principles
//
// 1. **No I/O here**: Network access lives in the implementation crates
// 2. **Validate early**: Settings are decoded and checked at construction
// 3. **Never retry**: Every failure is returned to the caller with its kind
// 4. **Shared safely**: Adapters and sources are immutable after construction

pub mod classify;
pub mod config;
pub mod error;
pub mod registry;
pub mod traits;
pub mod util;

// Re-export core types for convenience
pub use classify::{ResponseRule, Verdict, classify_response};
pub use config::{IpVersion, ProviderSettings, UpdaterConfig};
pub use error::{ConfigError, Error, ErrorKind, FetchError, Result, UpdateError};
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, DnsProviderFactory, IpSource};
