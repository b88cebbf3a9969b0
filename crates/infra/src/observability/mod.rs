//! Observability infrastructure
//!
//! Structured logging setup for the binary. Every crate logs through
//! `tracing` macros; this module only decides where events go.

pub mod logging;

pub use logging::{build_filter, init_tracing};
