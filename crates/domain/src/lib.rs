//! # TrackVault Domain
//!
//! Domain types and models for the TrackVault remote-operation layer.
//!
//! This crate contains:
//! - Tracked operation records and their lifecycle enums
//! - Health and metrics snapshots for the operator view
//! - Library records exchanged with the backend (tracks, playlists, search)
//! - Domain error types and Result definitions
//! - Configuration structures and defaults
//!
//! ## Architecture
//! - No dependencies on other TrackVault crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
