//! Library facade - maps library requests onto tracked remote operations

use std::sync::Arc;

use tracing::info;
use trackvault_domain::{
    NewPlaylist, OperationKind, Playlist, Result, SearchResult, Track, TrackUpdate,
    TrackVaultError,
};

use super::ports::LibraryBackend;
use crate::remote::{BatchOperation, BatchOutcome, ResilienceLayer};

/// Library operations with retry, circuit breaking and tracking.
///
/// Wraps a [`LibraryBackend`] by composition; every call becomes one
/// operation with a kind and a logical endpoint such as `GET /library`.
pub struct LibraryService<B> {
    backend: Arc<B>,
    layer: Arc<ResilienceLayer>,
}

impl<B> Clone for LibraryService<B> {
    fn clone(&self) -> Self {
        Self { backend: Arc::clone(&self.backend), layer: Arc::clone(&self.layer) }
    }
}

impl<B: LibraryBackend> LibraryService<B> {
    pub fn new(backend: Arc<B>, layer: Arc<ResilienceLayer>) -> Self {
        Self { backend, layer }
    }

    pub fn layer(&self) -> &Arc<ResilienceLayer> {
        &self.layer
    }

    pub async fn fetch_library(&self) -> Result<Vec<Track>> {
        let backend = self.backend.as_ref();
        self.layer.execute(OperationKind::Read, "GET /library", move || backend.fetch_library()).await
    }

    pub async fn fetch_track(&self, id: &str) -> Result<Track> {
        require_id(id, "track")?;
        let backend = self.backend.as_ref();
        let endpoint = format!("GET /songs/{id}");
        self.layer.execute(OperationKind::Read, &endpoint, move || backend.fetch_track(id)).await
    }

    pub async fn update_track(&self, id: &str, update: &TrackUpdate) -> Result<Track> {
        require_id(id, "track")?;
        let backend = self.backend.as_ref();
        let endpoint = format!("PATCH /songs/{id}");
        self.layer
            .execute(OperationKind::Update, &endpoint, move || backend.update_track(id, update))
            .await
    }

    pub async fn delete_track(&self, id: &str) -> Result<()> {
        require_id(id, "track")?;
        let backend = self.backend.as_ref();
        let endpoint = format!("DELETE /songs/{id}");
        self.layer.execute(OperationKind::Delete, &endpoint, move || backend.delete_track(id)).await
    }

    /// Delete several tracks; failures are reported per track, never as a whole.
    ///
    /// Results hold the ids that were deleted.
    pub async fn delete_tracks(&self, ids: &[String]) -> BatchOutcome<String> {
        let backend = self.backend.as_ref();
        let operations = ids
            .iter()
            .map(|id| {
                let id = id.clone();
                BatchOperation::new(OperationKind::Delete, format!("DELETE /songs/{id}"), move || {
                    let id = id.clone();
                    async move {
                        backend.delete_track(&id).await?;
                        Ok::<_, TrackVaultError>(id)
                    }
                })
            })
            .collect();

        let outcome = self.layer.run_batch(operations).await;
        info!(
            requested = ids.len(),
            deleted = outcome.success_count(),
            failed = outcome.failure_count(),
            "bulk track delete finished"
        );
        outcome
    }

    pub async fn fetch_playlists(&self) -> Result<Vec<Playlist>> {
        let backend = self.backend.as_ref();
        self.layer
            .execute(OperationKind::Read, "GET /playlists", move || backend.fetch_playlists())
            .await
    }

    pub async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<Playlist> {
        if playlist.name.trim().is_empty() {
            return Err(TrackVaultError::InvalidInput("playlist name must not be empty".into()));
        }
        let backend = self.backend.as_ref();
        self.layer
            .execute(OperationKind::Write, "POST /playlists", move || {
                backend.create_playlist(playlist)
            })
            .await
    }

    pub async fn delete_playlist(&self, id: &str) -> Result<()> {
        require_id(id, "playlist")?;
        let backend = self.backend.as_ref();
        let endpoint = format!("DELETE /playlists/{id}");
        self.layer
            .execute(OperationKind::Delete, &endpoint, move || backend.delete_playlist(id))
            .await
    }

    pub async fn search_remote(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TrackVaultError::InvalidInput("search query must not be empty".into()));
        }
        let backend = self.backend.as_ref();
        self.layer
            .execute(OperationKind::Read, "GET /search", move || backend.search_remote(query))
            .await
    }
}

fn require_id(id: &str, what: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(TrackVaultError::InvalidInput(format!("{what} id must not be empty")));
    }
    Ok(())
}
