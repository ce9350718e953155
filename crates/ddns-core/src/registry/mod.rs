//! Plugin-based provider registry
//!
//! The registry maps provider names to factories so records can be turned
//! into adapters from configuration without a hardcoded match over every
//! provider.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_core::registry::ProviderRegistry;
//! use ddns_core::config::UpdaterConfig;
//!
//! let registry = ProviderRegistry::new();
//! ddns_provider_dynu::register(&registry);
//!
//! let config = UpdaterConfig::from_json(&json)?;
//! for settings in &config.settings {
//!     let provider = registry.create_provider(settings)?;
//! }
//! ```

use crate::config::ProviderSettings;
use crate::error::ConfigError;
use crate::traits::{DnsProvider, DnsProviderFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Provider registry for plugin-based DNS provider creation
///
/// Registration normally happens once at startup; lookups may happen from
/// any thread afterwards.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Box<dyn DnsProviderFactory>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory under `name`
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_provider(&self, name: impl Into<String>, factory: Box<dyn DnsProviderFactory>) {
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        providers.insert(name.into(), factory);
    }

    /// Create a provider for one configured record
    ///
    /// Fails with [`ConfigError::UnknownProvider`] when no factory is
    /// registered for `settings.provider`, or with the factory's own
    /// validation error.
    pub fn create_provider(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Box<dyn DnsProvider>, ConfigError> {
        settings.validate()?;

        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        let factory = providers
            .get(settings.provider.as_str())
            .ok_or_else(|| ConfigError::UnknownProvider(settings.provider.clone()))?;

        let provider = factory.create(settings)?;
        tracing::debug!("Created provider {}", provider.summary());
        Ok(provider)
    }

    /// List all registered provider names, sorted
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IpVersion;
    use crate::error::UpdateError;
    use async_trait::async_trait;
    use std::net::IpAddr;

    struct StaticProvider {
        domain: String,
        host: String,
    }

    #[async_trait]
    impl DnsProvider for StaticProvider {
        async fn update(&self, ip: IpAddr) -> Result<IpAddr, UpdateError> {
            Ok(ip)
        }

        fn domain(&self) -> &str {
            &self.domain
        }

        fn host(&self) -> &str {
            &self.host
        }

        fn ip_version(&self) -> IpVersion {
            IpVersion::Both
        }

        fn provider_name(&self) -> &'static str {
            "static"
        }

        fn provider_url(&self) -> &'static str {
            "https://example.invalid/"
        }
    }

    struct StaticFactory;

    impl DnsProviderFactory for StaticFactory {
        fn create(&self, settings: &ProviderSettings) -> Result<Box<dyn DnsProvider>, ConfigError> {
            Ok(Box::new(StaticProvider {
                domain: settings.domain.clone(),
                host: settings.host.clone(),
            }))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        assert!(!registry.has_provider("static"));

        registry.register_provider("static", Box::new(StaticFactory));

        assert!(registry.has_provider("static"));
        assert_eq!(registry.list_providers(), vec!["static".to_string()]);
    }

    #[test]
    fn test_create_provider() {
        let registry = ProviderRegistry::new();
        registry.register_provider("static", Box::new(StaticFactory));

        let settings = ProviderSettings::new("static", "example.com", "www", IpVersion::Both);
        let provider = registry.create_provider(&settings).unwrap();

        assert_eq!(provider.build_domain_name(), "www.example.com");
        assert_eq!(
            provider.summary(),
            "[domain: example.com | host: www | provider: static | ip: ipv4 or ipv6]"
        );
    }

    #[test]
    fn test_unknown_provider() {
        let registry = ProviderRegistry::new();
        let settings = ProviderSettings::new("nope", "example.com", "", IpVersion::V4);

        match registry.create_provider(&settings) {
            Err(ConfigError::UnknownProvider(name)) => assert_eq!(name, "nope"),
            Err(other) => panic!("expected UnknownProvider, got {other:?}"),
            Ok(_) => panic!("expected UnknownProvider"),
        }
    }

    #[test]
    fn test_empty_domain_rejected_before_factory() {
        let registry = ProviderRegistry::new();
        registry.register_provider("static", Box::new(StaticFactory));
        let settings = ProviderSettings::new("static", "", "", IpVersion::V4);

        assert!(matches!(
            registry.create_provider(&settings),
            Err(ConfigError::EmptyDomain)
        ));
    }
}
