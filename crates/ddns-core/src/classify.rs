//! Ordered classification of free-text provider responses
//!
//! Many DDNS providers answer update requests with a short text body
//! (`good 203.0.113.5`, `nochg`, `badauth`, ...). Each adapter describes its
//! vocabulary as a table of [`ResponseRule`]s and hands the response to
//! [`classify_response`], which turns it into a success or an
//! [`UpdateError`].
//!
//! ## Precedence
//!
//! Outcomes are decided in a fixed order, independent of the order in which
//! rules appear in the table:
//!
//! 1. Non-2xx status → [`UpdateError::BadStatus`]
//! 2. [`Verdict::Auth`] marker → [`UpdateError::Auth`]
//! 3. [`Verdict::UnknownHost`] marker → [`UpdateError::UnknownHost`]
//! 4. [`Verdict::Abuse`] marker → [`UpdateError::Abuse`]
//! 5. [`Verdict::Updated`] or [`Verdict::Unchanged`] marker → the requested IP
//! 6. Anything else → [`UpdateError::UnknownResponse`]
//!
//! Transport failures never reach this module; adapters map them to
//! [`UpdateError::Network`] before a status exists.

use crate::error::UpdateError;
use crate::util::to_single_line;
use std::net::IpAddr;

/// What a matched marker means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Auth,
    UnknownHost,
    Abuse,
    /// Record updated to the requested address
    Updated,
    /// Record already had the requested address
    Unchanged,
}

impl Verdict {
    /// Evaluation order; earlier verdicts win when a body matches several markers
    pub const PRECEDENCE: [Verdict; 5] = [
        Verdict::Auth,
        Verdict::UnknownHost,
        Verdict::Abuse,
        Verdict::Updated,
        Verdict::Unchanged,
    ];
}

/// A substring marker and the verdict it signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseRule {
    pub marker: &'static str,
    pub verdict: Verdict,
}

impl ResponseRule {
    pub const fn new(marker: &'static str, verdict: Verdict) -> Self {
        Self { marker, verdict }
    }
}

/// Find the highest-precedence verdict whose marker occurs in `body`
pub fn match_verdict(rules: &[ResponseRule], body: &str) -> Option<Verdict> {
    Verdict::PRECEDENCE.into_iter().find(|verdict| {
        rules
            .iter()
            .any(|rule| rule.verdict == *verdict && body.contains(rule.marker))
    })
}

/// Classify a provider response
///
/// On success the *requested* address is returned: providers commonly omit
/// the address from "no change" answers, so the body is not re-parsed.
pub fn classify_response(
    rules: &[ResponseRule],
    status: u16,
    body: &str,
    requested: IpAddr,
) -> Result<IpAddr, UpdateError> {
    if !(200..300).contains(&status) {
        return Err(UpdateError::BadStatus {
            status,
            body: to_single_line(body),
        });
    }

    match match_verdict(rules, body) {
        Some(Verdict::Auth) => Err(UpdateError::Auth),
        Some(Verdict::UnknownHost) => Err(UpdateError::UnknownHost),
        Some(Verdict::Abuse) => Err(UpdateError::Abuse),
        Some(Verdict::Updated | Verdict::Unchanged) => Ok(requested),
        None => Err(UpdateError::UnknownResponse(to_single_line(body))),
    }
}
