//! Transient/fatal classification of failed remote calls.
//!
//! Callers describe a failure as a [`FailureSignal`] and [`classify`] decides
//! whether it is worth another attempt:
//! - a timeout or cancellation is transient
//! - a failure carrying an HTTP status is transient only when the status
//!   belongs to the retryable set; its message is not consulted
//! - a failure without a status is transient when its message indicates a
//!   network or transport failure
//!
//! Everything else is fatal.

use std::collections::BTreeSet;

/// Outcome of classifying a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Worth retrying within the retry budget
    Transient,
    /// Surface immediately
    Fatal,
}

impl ErrorClass {
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// Error-type independent view of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureSignal<'a> {
    pub timed_out: bool,
    pub status: Option<u16>,
    pub message: &'a str,
}

impl<'a> FailureSignal<'a> {
    pub fn from_message(message: &'a str) -> Self {
        Self { timed_out: false, status: None, message }
    }

    pub fn timed_out(mut self, timed_out: bool) -> Self {
        self.timed_out = timed_out;
        self
    }

    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    /// Explicit status, falling back to one embedded in the message.
    #[must_use]
    pub fn effective_status(&self) -> Option<u16> {
        self.status.or_else(|| status_from_message(self.message))
    }
}

const TRANSPORT_MARKERS: &[&str] = &[
    "network",
    "connection refused",
    "connection reset",
    "connection closed",
    "connection aborted",
    "failed to connect",
    "error sending request",
    "broken pipe",
    "dns error",
    "timed out",
    "timeout",
    "unreachable",
    "econnrefused",
    "econnreset",
    "etimedout",
];

/// Does the message read like a transport-level failure?
#[must_use]
pub fn indicates_transport_failure(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    TRANSPORT_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Extract a status code written as `HTTP 503` or `status 503`.
#[must_use]
pub fn status_from_message(message: &str) -> Option<u16> {
    let mut previous: Option<&str> = None;
    for token in message.split(|c: char| c.is_whitespace() || c == ':' || c == '=') {
        if token.is_empty() {
            continue;
        }
        if let Some(prev) = previous {
            let prev = prev.to_ascii_lowercase();
            if prev == "http" || prev == "status" {
                if let Some(code) = parse_status(token) {
                    return Some(code);
                }
            }
        }
        previous = Some(token);
    }
    None
}

fn parse_status(token: &str) -> Option<u16> {
    if token.len() != 3 {
        return None;
    }
    token.parse::<u16>().ok().filter(|code| (100..=599).contains(code))
}

/// Classify a failure against the retryable status set.
#[must_use]
pub fn classify(signal: &FailureSignal<'_>, retryable_status_codes: &BTreeSet<u16>) -> ErrorClass {
    let transient = if signal.timed_out {
        true
    } else {
        match signal.effective_status() {
            Some(status) => retryable_status_codes.contains(&status),
            None => indicates_transport_failure(signal.message),
        }
    };
    let class = if transient { ErrorClass::Transient } else { ErrorClass::Fatal };

    #[cfg(feature = "observability")]
    tracing::debug!(
        timed_out = signal.timed_out,
        status = ?signal.effective_status(),
        transient = class.is_transient(),
        "classified remote failure"
    );

    class
}
