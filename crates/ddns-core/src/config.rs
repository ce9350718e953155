//! Configuration types for the DDNS updater
//!
//! Records are configured as loosely-typed JSON objects. The fields every
//! provider shares are decoded here; everything else stays in
//! [`ProviderSettings::extra`] until the provider adapter decodes it into its
//! own typed struct at construction time.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address family policy for a record, and mode of a public IP lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IpVersion {
    /// IPv4 only
    #[serde(rename = "ipv4")]
    V4,
    /// IPv6 only
    #[serde(rename = "ipv6")]
    V6,
    /// Whichever family the network path yields
    #[default]
    #[serde(rename = "ipv4 or ipv6", alias = "both")]
    Both,
}

impl IpVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            IpVersion::V4 => "ipv4",
            IpVersion::V6 => "ipv6",
            IpVersion::Both => "ipv4 or ipv6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ipv4" => Ok(IpVersion::V4),
            "ipv6" => Ok(IpVersion::V6),
            "ipv4 or ipv6" | "both" | "" => Ok(IpVersion::Both),
            other => Err(format!("unknown IP version: {other}")),
        }
    }
}

/// Settings for one managed record, as read from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider name used for registry lookup (e.g., "dynu")
    pub provider: String,

    /// Registrable domain (e.g., "example.com")
    pub domain: String,

    /// Subdomain label, `@` for the root or `*` for a wildcard.
    /// Empty means root; adapters normalize it to `@`.
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub ip_version: IpVersion,

    /// Provider-specific keys (credentials, flags, identifiers)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProviderSettings {
    /// Create settings with no provider-specific keys
    pub fn new(
        provider: impl Into<String>,
        domain: impl Into<String>,
        host: impl Into<String>,
        ip_version: IpVersion,
    ) -> Self {
        Self {
            provider: provider.into(),
            domain: domain.into(),
            host: host.into(),
            ip_version,
            extra: serde_json::Map::new(),
        }
    }

    /// Add a provider-specific key
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Decode the provider-specific keys into the adapter's typed settings
    pub fn decode_extra<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let value = serde_json::Value::Object(self.extra.clone());
        Ok(serde_json::from_value(value)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.trim().is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        Ok(())
    }
}

/// Top-level configuration document: `{"settings": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    pub settings: Vec<ProviderSettings>,
}

impl UpdaterConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.is_empty() {
            return Err(ConfigError::NoRecords);
        }
        self.settings.iter().try_for_each(ProviderSettings::validate)
    }
}
