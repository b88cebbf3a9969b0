//! Modular common utilities shared across TrackVault crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: retry configuration, failure classification, collections
//! - `observability`: tracing of classification decisions
//! - `runtime`: everything above

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod collections;
#[cfg(feature = "foundation")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use collections::SlidingWindow;
#[cfg(feature = "foundation")]
pub use resilience::{
    classify, policies, ConfigError, ConfigResult, ErrorClass, FailureSignal, RetryConfig,
    RetryConfigBuilder, RetryDecision, RetryPolicy,
};
