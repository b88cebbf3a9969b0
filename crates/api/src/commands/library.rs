//! Library commands routed through the resilient facade

use trackvault_core::BatchOutcome;
use trackvault_domain::{NewPlaylist, Playlist, Result, SearchResult, Track, TrackUpdate};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn fetch_library(ctx: &AppContext) -> Result<Vec<Track>> {
    execute_command("library::fetch_library", || ctx.library.fetch_library()).await
}

pub async fn fetch_track(ctx: &AppContext, id: &str) -> Result<Track> {
    execute_command("library::fetch_track", || ctx.library.fetch_track(id)).await
}

pub async fn update_track(ctx: &AppContext, id: &str, update: &TrackUpdate) -> Result<Track> {
    execute_command("library::update_track", || ctx.library.update_track(id, update)).await
}

pub async fn delete_track(ctx: &AppContext, id: &str) -> Result<()> {
    execute_command("library::delete_track", || ctx.library.delete_track(id)).await
}

/// Bulk delete. Never fails as a whole; per-track failures are in the outcome.
pub async fn delete_tracks(ctx: &AppContext, ids: &[String]) -> Result<BatchOutcome<String>> {
    execute_command("library::delete_tracks", || async {
        Ok(ctx.library.delete_tracks(ids).await)
    })
    .await
}

pub async fn fetch_playlists(ctx: &AppContext) -> Result<Vec<Playlist>> {
    execute_command("library::fetch_playlists", || ctx.library.fetch_playlists()).await
}

pub async fn create_playlist(ctx: &AppContext, playlist: &NewPlaylist) -> Result<Playlist> {
    execute_command("library::create_playlist", || ctx.library.create_playlist(playlist)).await
}

pub async fn delete_playlist(ctx: &AppContext, id: &str) -> Result<()> {
    execute_command("library::delete_playlist", || ctx.library.delete_playlist(id)).await
}

pub async fn search_remote(ctx: &AppContext, query: &str) -> Result<Vec<SearchResult>> {
    execute_command("library::search_remote", || ctx.library.search_remote(query)).await
}
