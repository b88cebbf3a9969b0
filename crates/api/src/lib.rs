//! # TrackVault App
//!
//! Application layer - commands, composition root and the binary entry point.
//!
//! This crate contains:
//! - Commands for the monitoring panel and the library
//! - Application context (dependency injection)
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires HTTP adapters into the resilience layer

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
