//! Hostname and diagnostics helpers shared by provider adapters

use crate::config::IpVersion;

/// Host value denoting the bare registrable domain
pub const ROOT_HOST: &str = "@";

/// Host value denoting a wildcard record
pub const WILDCARD_HOST: &str = "*";

/// Maximum characters of a response body kept in error values
const MAX_DIAGNOSTIC_CHARS: usize = 200;

/// Client identification header value sent with every outbound request
pub const USER_AGENT: &str = concat!("ddns-updater/", env!("CARGO_PKG_VERSION"));

/// Normalize an empty host to the root marker
pub fn normalize_host(host: &str) -> String {
    if host.is_empty() {
        ROOT_HOST.to_string()
    } else {
        host.to_string()
    }
}

/// Build the fully-qualified hostname for `host` under `domain`
///
/// The root marker (or an empty host) yields the bare domain.
pub fn build_domain_name(host: &str, domain: &str) -> String {
    if host.is_empty() || host == ROOT_HOST {
        domain.to_string()
    } else {
        format!("{host}.{domain}")
    }
}

/// Collapse a response body onto one line and cap its length
///
/// Used wherever a provider response ends up inside an error value or a
/// log line.
pub fn to_single_line(s: &str) -> String {
    let line = s.split_whitespace().collect::<Vec<_>>().join(" ");
    match line.char_indices().nth(MAX_DIAGNOSTIC_CHARS) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line,
    }
}

/// One-line description of a managed record
pub fn describe(domain: &str, host: &str, provider: &str, ip_version: IpVersion) -> String {
    format!("[domain: {domain} | host: {host} | provider: {provider} | ip: {ip_version}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_domain_name() {
        assert_eq!(build_domain_name("@", "example.com"), "example.com");
        assert_eq!(build_domain_name("", "example.com"), "example.com");
        assert_eq!(build_domain_name("sub", "example.com"), "sub.example.com");
        assert_eq!(build_domain_name("*", "example.com"), "*.example.com");
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host(""), "@");
        assert_eq!(normalize_host("www"), "www");
    }

    #[test]
    fn test_to_single_line() {
        assert_eq!(to_single_line("badauth\r\n"), "badauth");
        assert_eq!(to_single_line("line one\n  line two\n"), "line one line two");
        assert_eq!(to_single_line(""), "");
    }

    #[test]
    fn test_to_single_line_truncates_on_char_boundary() {
        let long = "é".repeat(500);
        let line = to_single_line(&long);

        assert!(line.ends_with("..."));
        assert_eq!(line.chars().count(), MAX_DIAGNOSTIC_CHARS + 3);
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            describe("example.com", "@", "dynu", IpVersion::V4),
            "[domain: example.com | host: @ | provider: dynu | ip: ipv4]"
        );
    }
}
