//! HTTP adapters for the core ports
//!
//! - [`HttpLibraryBackend`] implements `LibraryBackend`
//! - [`HttpHealthProbe`] implements `HealthProbe`

pub mod health_probe;
pub mod library;

pub use health_probe::HttpHealthProbe;
pub use library::HttpLibraryBackend;
