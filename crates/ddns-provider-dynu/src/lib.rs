// # Dynu DNS Provider
//
// This crate provides the Dynu provider implementation for the DDNS updater.
//
// ## Behavior
//
// - ✅ One HTTPS GET per update (dyndns2-style `/nic/update`)
// - ✅ Credentials sent as query parameters, never logged
// - ✅ `myip` for IPv4 and `myipv6` for IPv6, omitted entirely when the
//   provider is asked to detect the address itself (`provider_ip`)
// - ✅ Optional location / group (`group` setting)
// - ❌ NO retry logic (owned by the caller's scheduler)
// - ❌ NO wildcard hosts (rejected at construction)
//
// ## Response markers
//
// | Marker    | Outcome                  |
// |-----------|--------------------------|
// | `badauth` | `UpdateError::Auth`      |
// | `notfqdn` | `UpdateError::UnknownHost` |
// | `abuse`   | `UpdateError::Abuse`     |
// | `good`    | success                  |
// | `nochg`   | success (no change)      |
//
// ## API Reference
//
// - https://www.dynu.com/DynamicDNS/IP-Update-Protocol

use async_trait::async_trait;
use ddns_core::classify::{ResponseRule, Verdict, classify_response};
use ddns_core::traits::{DnsProvider, DnsProviderFactory};
use ddns_core::util::{self, WILDCARD_HOST};
use ddns_core::{ConfigError, IpVersion, ProviderRegistry, ProviderSettings, UpdateError};
use serde::Deserialize;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Provider name used in configuration
pub const PROVIDER_NAME: &str = "dynu";

/// Dynu update endpoint
const DYNU_UPDATE_URL: &str = "https://api.dynu.com/nic/update";

/// Default HTTP timeout for update requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Dynu response vocabulary
pub const RESPONSE_RULES: &[ResponseRule] = &[
    ResponseRule::new("badauth", Verdict::Auth),
    ResponseRule::new("notfqdn", Verdict::UnknownHost),
    ResponseRule::new("abuse", Verdict::Abuse),
    ResponseRule::new("good", Verdict::Updated),
    ResponseRule::new("nochg", Verdict::Unchanged),
];

/// Dynu-specific settings, decoded from the record's extra keys
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DynuSettings {
    #[serde(default)]
    pub username: String,

    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub password: String,

    /// Let Dynu use the address the request comes from
    #[serde(default, rename = "provider_ip")]
    pub use_provider_ip: bool,

    /// Dynu location (group) to update
    #[serde(default)]
    pub group: String,
}

impl fmt::Debug for DynuSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynuSettings")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("use_provider_ip", &self.use_provider_ip)
            .field("group", &self.group)
            .finish()
    }
}

/// Dynu DNS provider
///
/// Immutable after construction; safe to share across tasks.
pub struct DynuProvider {
    domain: String,
    host: String,
    ip_version: IpVersion,
    settings: DynuSettings,
    update_url: String,
    client: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl fmt::Debug for DynuProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynuProvider")
            .field("domain", &self.domain)
            .field("host", &self.host)
            .field("ip_version", &self.ip_version)
            .field("settings", &self.settings)
            .field("update_url", &self.update_url)
            .finish()
    }
}

impl DynuProvider {
    /// Create a new Dynu provider
    ///
    /// An empty `host` is normalized to the root marker `@`. Validation
    /// happens before anything else; no request is ever built for an
    /// invalid configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyUsername`]
    /// - [`ConfigError::EmptyPassword`]
    /// - [`ConfigError::WildcardHostForbidden`] when `host` is `*`
    pub fn new(
        settings: DynuSettings,
        domain: impl Into<String>,
        host: &str,
        ip_version: IpVersion,
    ) -> Result<Self, ConfigError> {
        let host = util::normalize_host(host);

        if settings.username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        if settings.password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        if host == WILDCARD_HOST {
            return Err(ConfigError::WildcardHostForbidden);
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            domain: domain.into(),
            host,
            ip_version,
            settings,
            update_url: DYNU_UPDATE_URL.to_string(),
            client,
        })
    }

    /// Create a provider from untyped record settings
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ConfigError> {
        let dynu: DynuSettings = settings.decode_extra()?;
        Self::new(dynu, settings.domain.clone(), &settings.host, settings.ip_version)
    }

    /// Use a shared or custom HTTP client
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point updates at a different endpoint (for testing)
    pub fn with_update_url(mut self, update_url: impl Into<String>) -> Self {
        self.update_url = update_url.into();
        self
    }

    pub fn uses_provider_ip(&self) -> bool {
        self.settings.use_provider_ip
    }

    /// Build the update request URL for `ip`
    ///
    /// The address goes in `myip` (IPv4) or `myipv6` (IPv6), and is left out
    /// when the provider detects the address itself.
    pub fn update_request_url(&self, ip: IpAddr) -> Result<reqwest::Url, UpdateError> {
        let hostname = self.build_domain_name();
        let ip_text = ip.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("username", self.settings.username.as_str()),
            ("password", self.settings.password.as_str()),
            ("location", self.settings.group.as_str()),
            ("hostname", hostname.as_str()),
        ];
        if !self.settings.use_provider_ip {
            let key = if ip.is_ipv6() { "myipv6" } else { "myip" };
            params.push((key, ip_text.as_str()));
        }

        reqwest::Url::parse_with_params(&self.update_url, &params)
            .map_err(|e| UpdateError::BadRequest(format!("invalid update URL: {e}")))
    }
}

#[async_trait]
impl DnsProvider for DynuProvider {
    async fn update(&self, ip: IpAddr) -> Result<IpAddr, UpdateError> {
        let url = self.update_request_url(ip)?;
        let hostname = self.build_domain_name();

        tracing::debug!(
            "Updating Dynu record {} -> {} [provider_ip: {}]",
            hostname,
            ip,
            self.settings.use_provider_ip
        );

        // The URL carries credentials, so it is stripped from transport errors
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, util::USER_AGENT)
            .send()
            .await
            .map_err(|e| UpdateError::network(e.without_url()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| UpdateError::network(e.without_url()))?;

        let result = classify_response(RESPONSE_RULES, status, &body, ip);
        match &result {
            Ok(published) => tracing::info!("Dynu record updated: {} -> {}", hostname, published),
            Err(e) => tracing::warn!(kind = ?e.kind(), "Dynu update failed for {}: {}", hostname, e),
        }
        result
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn ip_version(&self) -> IpVersion {
        self.ip_version
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn provider_url(&self) -> &'static str {
        "https://dynu.com/"
    }
}

/// Factory for creating Dynu providers
pub struct DynuFactory;

impl DnsProviderFactory for DynuFactory {
    fn create(&self, settings: &ProviderSettings) -> Result<Box<dyn DnsProvider>, ConfigError> {
        Ok(Box::new(DynuProvider::from_settings(settings)?))
    }
}

/// Register the Dynu provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// ddns_provider_dynu::register(&registry);
/// assert!(registry.has_provider("dynu"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(DynuFactory));
}
