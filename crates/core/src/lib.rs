//! # TrackVault Core
//!
//! Business logic of the remote-operation layer - no HTTP or platform code.
//!
//! This crate contains:
//! - The retry executor, operation registry, circuit breaker, batch runner
//!   and health monitor ([`remote`])
//! - The library facade routing requests through them ([`library`])
//! - Port interfaces implemented by `trackvault-infra`
//!
//! ## Architecture Principles
//! - Only depends on `trackvault-common` and `trackvault-domain`
//! - All external systems reached through traits
//! - Time-dependent behaviour driven by tokio timers so tests can pause the clock

pub mod library;
pub mod remote;

pub use library::ports::LibraryBackend;
pub use library::LibraryService;
pub use remote::{
    BatchExecutor, BatchFailure, BatchOperation, BatchOutcome, CircuitBreaker, CircuitRejection,
    HealthMonitor, HealthMonitorConfig, HealthProbe, HealthStatusListener, OperationRegistry,
    ProbeHandle, RemoteMetrics, ResilienceConfig, ResilienceLayer, RetryExecutor, RetryOutcome,
    StatusAwarePolicy,
};
