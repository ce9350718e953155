//! Error types for the DDNS updater
//!
//! Errors are split by the phase in which they can occur:
//!
//! - [`ConfigError`]: construction-time validation. Never involves network I/O.
//! - [`UpdateError`]: a single provider update call.
//! - [`FetchError`]: a single public IP echo call.
//!
//! Every error maps onto the closed [`ErrorKind`] taxonomy so callers can
//! branch on the kind (for retry or alerting) without matching message text.

use crate::config::IpVersion;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

/// Boxed underlying cause of a transport failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of error kinds shared by every provider and IP source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required credential (username, password, token) is empty
    EmptyCredential,
    /// The host is the `*` wildcard and the provider forbids it
    WildcardHostForbidden,
    /// Settings could not be decoded or are otherwise invalid
    InvalidSettings,
    /// No adapter is registered under the requested provider name
    UnknownProvider,
    /// The request could not be built before sending
    BadRequest,
    /// Transport or connection failure
    Network,
    /// Non-2xx HTTP status
    BadStatus,
    /// Provider rejected the credentials
    Auth,
    /// Provider does not know the hostname
    UnknownHost,
    /// Provider blocked the update for abuse or rate limiting
    Abuse,
    /// Provider answered with something no rule recognizes
    UnknownResponse,
    /// IP echo body was empty or unparsable
    Parse,
    /// Call exceeded its deadline
    Timeout,
    /// IP echo returned an address of the wrong family
    FamilyMismatch,
}

impl ErrorKind {
    /// Whether retrying the same call later can plausibly succeed
    ///
    /// Configuration and credential problems never fix themselves; transport
    /// and server-side conditions usually do.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Network
                | ErrorKind::BadStatus
                | ErrorKind::Timeout
                | ErrorKind::UnknownResponse
                | ErrorKind::Parse
        )
    }
}

/// Construction-time validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Provider settings did not match the expected shape
    #[error("invalid provider settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("host cannot be a wildcard for this provider")]
    WildcardHostForbidden,

    #[error("domain cannot be empty")]
    EmptyDomain,

    #[error("no records configured")]
    NoRecords,

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A ring for this family would have no members
    #[error("no IP echo source supports {0}")]
    NoEchoSources(IpVersion),

    /// The HTTP transport could not be built
    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::EmptyUsername | ConfigError::EmptyPassword => ErrorKind::EmptyCredential,
            ConfigError::WildcardHostForbidden => ErrorKind::WildcardHostForbidden,
            ConfigError::UnknownProvider(_) => ErrorKind::UnknownProvider,
            ConfigError::InvalidSettings(_)
            | ConfigError::EmptyDomain
            | ConfigError::NoRecords
            | ConfigError::NoEchoSources(_)
            | ConfigError::HttpClient(_) => ErrorKind::InvalidSettings,
        }
    }
}

/// Outcome of a provider update call that did not succeed
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// Non-2xx status with the single-line, truncated body
    #[error("bad HTTP status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("authentication failed")]
    Auth,

    #[error("hostname does not exist")]
    UnknownHost,

    #[error("updates blocked for abuse")]
    Abuse,

    #[error("unknown response: {0}")]
    UnknownResponse(String),
}

impl UpdateError {
    /// Wrap a transport failure, keeping it as the error source
    pub fn network(err: impl Into<BoxError>) -> Self {
        Self::Network(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UpdateError::BadRequest(_) => ErrorKind::BadRequest,
            UpdateError::Network(_) => ErrorKind::Network,
            UpdateError::BadStatus { .. } => ErrorKind::BadStatus,
            UpdateError::Auth => ErrorKind::Auth,
            UpdateError::UnknownHost => ErrorKind::UnknownHost,
            UpdateError::Abuse => ErrorKind::Abuse,
            UpdateError::UnknownResponse(_) => ErrorKind::UnknownResponse,
        }
    }
}

/// Failure of a single public IP echo call
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error querying {source_name}: {cause}")]
    Network {
        source_name: String,
        #[source]
        cause: BoxError,
    },

    #[error("{source_name} did not answer within {timeout:?}")]
    Timeout {
        source_name: String,
        timeout: Duration,
    },

    #[error("{source_name} returned HTTP status {status}: {body}")]
    BadStatus {
        source_name: String,
        status: u16,
        body: String,
    },

    #[error("{source_name} returned no parsable IP address: {body:?}")]
    Parse { source_name: String, body: String },

    #[error("{source_name} returned {got}, expected {expected}")]
    FamilyMismatch {
        source_name: String,
        expected: IpVersion,
        got: IpAddr,
    },
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network { .. } => ErrorKind::Network,
            FetchError::Timeout { .. } => ErrorKind::Timeout,
            FetchError::BadStatus { .. } => ErrorKind::BadStatus,
            FetchError::Parse { .. } => ErrorKind::Parse,
            FetchError::FamilyMismatch { .. } => ErrorKind::FamilyMismatch,
        }
    }

    /// Name of the echo source that produced this error
    pub fn source_name(&self) -> &str {
        match self {
            FetchError::Network { source_name, .. }
            | FetchError::Timeout { source_name, .. }
            | FetchError::BadStatus { source_name, .. }
            | FetchError::Parse { source_name, .. }
            | FetchError::FamilyMismatch { source_name, .. } => source_name,
        }
    }
}

/// Umbrella error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("update failed: {0}")]
    Update(#[from] UpdateError),

    #[error("public IP lookup failed: {0}")]
    Fetch(#[from] FetchError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(e) => e.kind(),
            Error::Update(e) => e.kind(),
            Error::Fetch(e) => e.kind(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_share_kind() {
        assert_eq!(ConfigError::EmptyUsername.kind(), ErrorKind::EmptyCredential);
        assert_eq!(ConfigError::EmptyPassword.kind(), ErrorKind::EmptyCredential);
        assert_eq!(
            ConfigError::WildcardHostForbidden.kind(),
            ErrorKind::WildcardHostForbidden
        );
    }

    #[test]
    fn test_retry_guidance() {
        assert!(!ErrorKind::Auth.is_retryable());
        assert!(!ErrorKind::WildcardHostForbidden.is_retryable());
        assert!(!ErrorKind::EmptyCredential.is_retryable());
        assert!(ErrorKind::Network.is_retryable());
        assert!(ErrorKind::BadStatus.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
    }

    #[test]
    fn test_network_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = UpdateError::network(io);

        assert_eq!(err.kind(), ErrorKind::Network);
        let source = std::error::Error::source(&err).expect("source is kept");
        assert_eq!(source.to_string(), "refused");
    }

    #[test]
    fn test_bad_status_message_carries_context() {
        let err = UpdateError::BadStatus {
            status: 503,
            body: "service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "bad HTTP status 503: service unavailable");
    }

    #[test]
    fn test_umbrella_preserves_kind() {
        let err: Error = UpdateError::Abuse.into();
        assert_eq!(err.kind(), ErrorKind::Abuse);
        assert!(!err.is_retryable());
    }
}
