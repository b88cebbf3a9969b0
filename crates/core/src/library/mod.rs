//! Library operations routed through the resilience layer

pub mod ports;
pub mod service;

pub use service::LibraryService;
