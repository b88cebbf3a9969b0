//! Resilience primitives for remote calls
//!
//! - **[`retry`]**: retry configuration with exponential backoff, validation
//!   and pluggable [`RetryPolicy`] implementations
//! - **[`classify`]**: transient/fatal classification of failures
//!
//! Both are generic and side-effect free. The async executor, circuit breaker
//! and health monitor built on top of them live in `trackvault-core`.

pub mod classify;
pub mod retry;

pub use classify::{classify, ErrorClass, FailureSignal};
pub use retry::{
    policies, ConfigError, ConfigResult, RetryConfig, RetryConfigBuilder, RetryDecision,
    RetryPolicy, DEFAULT_RETRYABLE_STATUS_CODES,
};
