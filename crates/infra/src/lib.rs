//! # TrackVault Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client and its error mapping
//! - HTTP adapters for the library backend and the health endpoint
//! - Configuration loading from environment variables and files
//! - Tracing subscriber setup
//! - The monitoring-view poller
//!
//! ## Architecture
//! - Implements traits defined in `trackvault-core`
//! - Contains all "impure" code (network, filesystem, global subscriber)

pub mod backend;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod scheduling;

// Re-export commonly used items
pub use backend::{HttpHealthProbe, HttpLibraryBackend};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use scheduling::{MonitorPoller, MonitoringView, SchedulerError};
