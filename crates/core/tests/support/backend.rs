use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use trackvault_core::LibraryBackend;
use trackvault_domain::{
    NewPlaylist, Playlist, Result, SearchResult, Track, TrackUpdate, TrackVaultError,
};

/// In-memory library with scriptable per-method failures.
///
/// Failures queued with `fail_next` are returned, in order,
/// by the next calls to that method before the in-memory behaviour resumes.
#[derive(Default)]
pub struct FakeLibraryBackend {
    tracks: Mutex<Vec<Track>>,
    playlists: Mutex<Vec<Playlist>>,
    failures: Mutex<HashMap<&'static str, VecDeque<TrackVaultError>>>,
    calls: Mutex<HashMap<&'static str, u32>>,
}

pub fn track(id: &str, title: &str) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: "Test Artist".to_string(),
        album: None,
        key: Some("8A".to_string()),
        bpm: Some(124.0),
        duration_ms: Some(215_000),
    }
}

impl FakeLibraryBackend {
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        let backend = Self::default();
        *backend.tracks.lock() = tracks;
        backend
    }

    /// Queue errors for the next calls of `method`.
    pub fn fail_next(&self, method: &'static str, errors: Vec<TrackVaultError>) {
        self.failures.lock().entry(method).or_default().extend(errors);
    }

    pub fn calls(&self, method: &'static str) -> u32 {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.lock().iter().map(|track| track.id.clone()).collect()
    }

    fn enter(&self, method: &'static str) -> Result<()> {
        *self.calls.lock().entry(method).or_default() += 1;
        match self.failures.lock().get_mut(method).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn missing(id: &str) -> TrackVaultError {
        TrackVaultError::http(404, format!("song {id} not found"))
    }
}

#[async_trait]
impl LibraryBackend for FakeLibraryBackend {
    async fn fetch_library(&self) -> Result<Vec<Track>> {
        self.enter("fetch_library")?;
        Ok(self.tracks.lock().clone())
    }

    async fn fetch_track(&self, id: &str) -> Result<Track> {
        self.enter("fetch_track")?;
        self.tracks
            .lock()
            .iter()
            .find(|track| track.id == id)
            .cloned()
            .ok_or_else(|| Self::missing(id))
    }

    async fn update_track(&self, id: &str, update: &TrackUpdate) -> Result<Track> {
        self.enter("update_track")?;
        let mut tracks = self.tracks.lock();
        let track = tracks.iter_mut().find(|track| track.id == id).ok_or_else(|| Self::missing(id))?;
        if let Some(title) = &update.title {
            track.title = title.clone();
        }
        if let Some(artist) = &update.artist {
            track.artist = artist.clone();
        }
        if let Some(album) = &update.album {
            track.album = Some(album.clone());
        }
        if let Some(key) = &update.key {
            track.key = Some(key.clone());
        }
        if let Some(bpm) = update.bpm {
            track.bpm = Some(bpm);
        }
        Ok(track.clone())
    }

    async fn delete_track(&self, id: &str) -> Result<()> {
        self.enter("delete_track")?;
        let mut tracks = self.tracks.lock();
        let before = tracks.len();
        tracks.retain(|track| track.id != id);
        if tracks.len() == before {
            return Err(Self::missing(id));
        }
        Ok(())
    }

    async fn fetch_playlists(&self) -> Result<Vec<Playlist>> {
        self.enter("fetch_playlists")?;
        Ok(self.playlists.lock().clone())
    }

    async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<Playlist> {
        self.enter("create_playlist")?;
        let mut playlists = self.playlists.lock();
        let created = Playlist {
            id: format!("pl-{}", playlists.len() + 1),
            name: playlist.name.clone(),
            track_ids: playlist.track_ids.clone(),
        };
        playlists.push(created.clone());
        Ok(created)
    }

    async fn delete_playlist(&self, id: &str) -> Result<()> {
        self.enter("delete_playlist")?;
        let mut playlists = self.playlists.lock();
        let before = playlists.len();
        playlists.retain(|playlist| playlist.id != id);
        if playlists.len() == before {
            return Err(TrackVaultError::http(404, format!("playlist {id} not found")));
        }
        Ok(())
    }

    async fn search_remote(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.enter("search_remote")?;
        let needle = query.to_lowercase();
        Ok(self
            .tracks
            .lock()
            .iter()
            .filter(|track| track.title.to_lowercase().contains(&needle))
            .map(|track| SearchResult {
                id: track.id.clone(),
                title: track.title.clone(),
                artist: track.artist.clone(),
                download_url: Some(format!("https://cdn.example/{}", track.id)),
                duration_ms: track.duration_ms,
            })
            .collect())
    }
}
