//! Library backend over the REST API
//!
//! | method            | route                  |
//! |-------------------|------------------------|
//! | `fetch_library`   | `GET /library`         |
//! | `fetch_track`     | `GET /songs/{id}`      |
//! | `update_track`    | `PATCH /songs/{id}`    |
//! | `delete_track`    | `DELETE /songs/{id}`   |
//! | `fetch_playlists` | `GET /playlists`       |
//! | `create_playlist` | `POST /playlists`      |
//! | `delete_playlist` | `DELETE /playlists/{id}` |
//! | `search_remote`   | `GET /search?q=...`    |

use async_trait::async_trait;
use reqwest::Method;
use trackvault_core::LibraryBackend;
use trackvault_domain::{NewPlaylist, Playlist, Result, SearchResult, Track, TrackUpdate};

use crate::http::HttpClient;

/// [`LibraryBackend`] that talks to the backend service with one HTTP request
/// per call.
#[derive(Clone, Debug)]
pub struct HttpLibraryBackend {
    client: HttpClient,
}

impl HttpLibraryBackend {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl LibraryBackend for HttpLibraryBackend {
    async fn fetch_library(&self) -> Result<Vec<Track>> {
        self.client.get_json(&["library"]).await
    }

    async fn fetch_track(&self, id: &str) -> Result<Track> {
        self.client.get_json(&["songs", id]).await
    }

    async fn update_track(&self, id: &str, update: &TrackUpdate) -> Result<Track> {
        self.client.send_json(Method::PATCH, &["songs", id], update).await
    }

    async fn delete_track(&self, id: &str) -> Result<()> {
        self.client.delete(&["songs", id]).await
    }

    async fn fetch_playlists(&self) -> Result<Vec<Playlist>> {
        self.client.get_json(&["playlists"]).await
    }

    async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<Playlist> {
        self.client.send_json(Method::POST, &["playlists"], playlist).await
    }

    async fn delete_playlist(&self, id: &str) -> Result<()> {
        self.client.delete(&["playlists", id]).await
    }

    async fn search_remote(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.client.get_json_with_query(&["search"], &[("q", query)]).await
    }
}
