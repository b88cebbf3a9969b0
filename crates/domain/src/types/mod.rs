//! Domain types and models

pub mod health;
pub mod library;
pub mod operation;

pub use health::{BackendHealthReport, HealthSnapshot, HealthStatus, MetricsSnapshot};
pub use library::{NewPlaylist, Playlist, SearchResult, Track, TrackUpdate};
pub use operation::{
    new_operation_id, Operation, OperationId, OperationKind, OperationPatch, OperationStatus,
};
