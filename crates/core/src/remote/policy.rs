//! Retry policy for [`TrackVaultError`] driven by failure classification.

use std::collections::BTreeSet;

use trackvault_common::{classify, FailureSignal, RetryConfig, RetryDecision, RetryPolicy};
use trackvault_domain::TrackVaultError;

/// Retries timeouts, transport failures and retryable HTTP statuses.
///
/// Circuit-breaker rejections are never retried: the breaker already decided
/// the backend should not be contacted.
#[derive(Debug, Clone)]
pub struct StatusAwarePolicy {
    retryable_status_codes: BTreeSet<u16>,
}

impl StatusAwarePolicy {
    pub fn new(retryable_status_codes: BTreeSet<u16>) -> Self {
        Self { retryable_status_codes }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.retryable_status_codes.clone())
    }
}

impl Default for StatusAwarePolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy<TrackVaultError> for StatusAwarePolicy {
    fn should_retry(&self, error: &TrackVaultError, _attempt: u32) -> RetryDecision {
        if error.is_rejection() {
            return RetryDecision::Stop;
        }

        let message = error.to_string();
        let signal = FailureSignal::from_message(&message)
            .timed_out(error.is_timeout())
            .with_status(error.status_code());

        if classify(&signal, &self.retryable_status_codes).is_transient() {
            RetryDecision::Retry
        } else {
            RetryDecision::Stop
        }
    }
}
