//! Background tasks owned by the infrastructure layer
//!
//! Schedulers follow the same lifecycle rules as the health monitor:
//! explicit `start`/`stop`, a join handle per spawned task, cancellation
//! through a token and a bounded join on shutdown.

pub mod error;
pub mod monitor_poller;

pub use error::{SchedulerError, SchedulerResult};
pub use monitor_poller::{MonitorPoller, MonitoringView};
