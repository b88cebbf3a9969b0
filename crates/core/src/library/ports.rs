//! Port interface for the backend library API
//!
//! Each method is a single attempt. Retries, circuit breaking and tracking
//! are added by [`LibraryService`](super::LibraryService).

use async_trait::async_trait;
use trackvault_domain::{NewPlaylist, Playlist, Result, SearchResult, Track, TrackUpdate};

/// Remote library storage
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    /// Every track in the library
    async fn fetch_library(&self) -> Result<Vec<Track>>;

    async fn fetch_track(&self, id: &str) -> Result<Track>;

    /// Apply a metadata edit and return the stored track
    async fn update_track(&self, id: &str, update: &TrackUpdate) -> Result<Track>;

    async fn delete_track(&self, id: &str) -> Result<()>;

    async fn fetch_playlists(&self) -> Result<Vec<Playlist>>;

    async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<Playlist>;

    async fn delete_playlist(&self, id: &str) -> Result<()>;

    /// Search the remote catalogue used by the download feature
    async fn search_remote(&self, query: &str) -> Result<Vec<SearchResult>>;
}
