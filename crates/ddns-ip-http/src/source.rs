//! Public IP echo services and their response formats

use ddns_core::IpVersion;
use std::net::IpAddr;

/// How an echo service encodes the caller's address in its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
    /// The body is the bare address, possibly with surrounding whitespace
    Plain,
    /// `key=value` lines; the address is the value of the given key
    KeyValue(&'static str),
    /// A JSON object; the address is the given top-level string field
    Json(&'static str),
}

impl ResponseFormat {
    /// Extract the address from a response body
    ///
    /// Returns `None` for empty or unparsable bodies.
    pub fn parse(&self, body: &str) -> Option<IpAddr> {
        match self {
            ResponseFormat::Plain => body.trim().parse().ok(),
            ResponseFormat::KeyValue(key) => body
                .lines()
                .filter_map(|line| line.split_once('='))
                .find(|(k, _)| k.trim() == *key)
                .and_then(|(_, value)| value.trim().parse().ok()),
            ResponseFormat::Json(field) => {
                let json: serde_json::Value = serde_json::from_str(body).ok()?;
                json.get(*field)?.as_str()?.trim().parse().ok()
            }
        }
    }
}

/// Endpoint URLs of one echo service, per address family mode
///
/// A missing endpoint means the service cannot answer in that mode and is
/// left out of that mode's ring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub any: Option<String>,
    pub v4: Option<String>,
    pub v6: Option<String>,
}

impl Endpoints {
    /// One URL for every mode; the transport forces the family
    pub fn dual_stack(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            any: Some(url.clone()),
            v4: Some(url.clone()),
            v6: Some(url),
        }
    }

    pub fn get(&self, version: IpVersion) -> Option<&str> {
        match version {
            IpVersion::Both => self.any.as_deref(),
            IpVersion::V4 => self.v4.as_deref(),
            IpVersion::V6 => self.v6.as_deref(),
        }
    }
}

/// One external "what is my IP" service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoSource {
    pub name: String,
    pub endpoints: Endpoints,
    pub format: ResponseFormat,
}

impl EchoSource {
    /// Build a source with arbitrary endpoints
    pub fn custom(name: impl Into<String>, endpoints: Endpoints, format: ResponseFormat) -> Self {
        Self {
            name: name.into(),
            endpoints,
            format,
        }
    }

    pub fn ipify() -> Self {
        Self::custom(
            "ipify",
            Endpoints {
                any: Some("https://api64.ipify.org".to_string()),
                v4: Some("https://api.ipify.org".to_string()),
                v6: Some("https://api6.ipify.org".to_string()),
            },
            ResponseFormat::Plain,
        )
    }

    pub fn icanhazip() -> Self {
        Self::custom(
            "icanhazip",
            Endpoints {
                any: Some("https://icanhazip.com".to_string()),
                v4: Some("https://ipv4.icanhazip.com".to_string()),
                v6: Some("https://ipv6.icanhazip.com".to_string()),
            },
            ResponseFormat::Plain,
        )
    }

    /// Cloudflare's trace endpoint (`ip=` line among other keys)
    pub fn cloudflare() -> Self {
        Self::custom(
            "cloudflare",
            Endpoints {
                any: Some("https://cloudflare.com/cdn-cgi/trace".to_string()),
                v4: Some("https://1.1.1.1/cdn-cgi/trace".to_string()),
                v6: Some("https://[2606:4700:4700::1111]/cdn-cgi/trace".to_string()),
            },
            ResponseFormat::KeyValue("ip"),
        )
    }

    pub fn seeip() -> Self {
        Self::custom(
            "seeip",
            Endpoints {
                any: Some("https://api.seeip.org/jsonip".to_string()),
                v4: Some("https://ipv4.seeip.org/jsonip".to_string()),
                v6: Some("https://ipv6.seeip.org/jsonip".to_string()),
            },
            ResponseFormat::Json("ip"),
        )
    }

    pub fn ifconfig_co() -> Self {
        Self::custom(
            "ifconfig.co",
            Endpoints::dual_stack("https://ifconfig.co/ip"),
            ResponseFormat::Plain,
        )
    }

    /// Built-in services, in rotation order
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::ipify(),
            Self::icanhazip(),
            Self::cloudflare(),
            Self::seeip(),
            Self::ifconfig_co(),
        ]
    }

    pub fn url(&self, version: IpVersion) -> Option<&str> {
        self.endpoints.get(version)
    }
}
