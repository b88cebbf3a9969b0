//! Resilient execution of calls to the remote backend
//!
//! - **[`retry`]**: bounded retry with exponential backoff
//! - **[`registry`]**: in-flight operation table for the monitoring view
//! - **[`metrics`]**: shared success/error counters and probe statistics
//! - **[`breaker`]**: fast rejection while the backend is unhealthy
//! - **[`batch`]**: best-effort execution of independent operations
//! - **[`health`]**: background health prober
//! - **[`layer`]**: all of the above behind one handle

pub mod batch;
pub mod breaker;
pub mod health;
pub mod layer;
pub mod metrics;
pub mod policy;
pub mod ports;
pub mod registry;
pub mod retry;

pub use batch::{BatchExecutor, BatchFailure, BatchOperation, BatchOutcome};
pub use breaker::{CircuitBreaker, CircuitRejection};
pub use health::{HealthMonitor, HealthMonitorConfig, ProbeHandle};
pub use layer::{ResilienceConfig, ResilienceLayer};
pub use metrics::{RemoteMetrics, StatusTransition};
pub use policy::StatusAwarePolicy;
pub use ports::{HealthProbe, HealthStatusListener};
pub use registry::OperationRegistry;
pub use retry::{RetryExecutor, RetryOutcome};
