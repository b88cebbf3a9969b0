//! Command surface of the application
//!
//! Commands take the [`AppContext`](crate::context::AppContext) by reference
//! and return domain results, so any front end (CLI, IPC bridge, tests) can
//! call them directly.

pub mod health;
pub mod library;
pub mod monitoring;

pub use health::get_app_health;
pub use library::{
    create_playlist, delete_playlist, delete_track, delete_tracks, fetch_library,
    fetch_playlists, fetch_track, search_remote, update_track,
};
pub use monitoring::{
    get_backend_health, get_metrics, get_monitoring_view, get_operation_queue, probe_backend,
};
