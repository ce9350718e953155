//! IP echo client: one echo service reached over one transport

use crate::source::{EchoSource, ResponseFormat};
use ddns_core::util::to_single_line;
use ddns_core::{ConfigError, FetchError, IpVersion};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

/// Build the HTTP transport for an address family mode
///
/// IPv4 and IPv6 modes bind the local side to the unspecified address of
/// that family, which forces the connection onto it. Proxies are disabled:
/// behind a proxy the echo service would report the proxy's address.
pub fn build_transport(version: IpVersion, timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    let local_address: Option<IpAddr> = match version {
        IpVersion::Both => None,
        IpVersion::V4 => Some(Ipv4Addr::UNSPECIFIED.into()),
        IpVersion::V6 => Some(Ipv6Addr::UNSPECIFIED.into()),
    };

    reqwest::Client::builder()
        .user_agent(ddns_core::util::USER_AGENT)
        .timeout(timeout)
        .local_address(local_address)
        .no_proxy()
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// Queries one echo service in one address family mode
#[derive(Debug, Clone)]
pub struct EchoClient {
    name: String,
    url: String,
    format: ResponseFormat,
    version: IpVersion,
    transport: reqwest::Client,
}

impl EchoClient {
    /// Bind `source` to `transport` for `version`
    ///
    /// Returns `None` when the source has no endpoint for that mode.
    pub fn new(source: &EchoSource, version: IpVersion, transport: reqwest::Client) -> Option<Self> {
        let url = source.url(version)?.to_string();
        Some(Self {
            name: source.name.clone(),
            url,
            format: source.format.clone(),
            version,
            transport,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn version(&self) -> IpVersion {
        self.version
    }

    /// Perform one lookup, bounded by `timeout`
    ///
    /// No retries. In IPv4 or IPv6 mode an answer of the other family is
    /// reported as [`FetchError::FamilyMismatch`].
    pub async fn fetch(&self, timeout: Duration) -> Result<IpAddr, FetchError> {
        tracing::debug!(source = %self.name, url = %self.url, version = %self.version, "Querying IP echo service");

        let ip = match tokio::time::timeout(timeout, self.request(timeout)).await {
            Ok(result) => result?,
            Err(_) => return Err(self.timeout_error(timeout)),
        };

        let family_ok = match self.version {
            IpVersion::Both => true,
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
        };
        if !family_ok {
            return Err(FetchError::FamilyMismatch {
                source_name: self.name.clone(),
                expected: self.version,
                got: ip,
            });
        }

        Ok(ip)
    }

    async fn request(&self, timeout: Duration) -> Result<IpAddr, FetchError> {
        let response = self
            .transport
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.transport_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, timeout))?;

        if !status.is_success() {
            return Err(FetchError::BadStatus {
                source_name: self.name.clone(),
                status: status.as_u16(),
                body: to_single_line(&body),
            });
        }

        self.format.parse(&body).ok_or_else(|| FetchError::Parse {
            source_name: self.name.clone(),
            body: to_single_line(&body),
        })
    }

    fn transport_error(&self, err: reqwest::Error, timeout: Duration) -> FetchError {
        if err.is_timeout() {
            self.timeout_error(timeout)
        } else {
            FetchError::Network {
                source_name: self.name.clone(),
                cause: Box::new(err),
            }
        }
    }

    fn timeout_error(&self, timeout: Duration) -> FetchError {
        FetchError::Timeout {
            source_name: self.name.clone(),
            timeout,
        }
    }
}
