//! Library facade behaviour against an in-memory backend.

mod support;

use std::sync::Arc;

use support::backend::track;
use support::{layer_with_probe, FakeLibraryBackend, ScriptedProbe};
use trackvault_core::LibraryService;
use trackvault_domain::{NewPlaylist, TrackUpdate, TrackVaultError};

fn library(tracks: Vec<trackvault_domain::Track>) -> (LibraryService<FakeLibraryBackend>, Arc<FakeLibraryBackend>) {
    let backend = Arc::new(FakeLibraryBackend::with_tracks(tracks));
    let layer = layer_with_probe(Arc::new(ScriptedProbe::healthy()));
    (LibraryService::new(Arc::clone(&backend), layer), backend)
}

#[tokio::test]
async fn update_track_returns_stored_track() {
    let (service, _) = library(vec![track("t1", "Night Drive")]);
    let update = TrackUpdate { key: Some("9A".into()), bpm: Some(126.0), ..TrackUpdate::default() };

    let updated = service.update_track("t1", &update).await.unwrap();

    assert_eq!(updated.key.as_deref(), Some("9A"));
    assert_eq!(updated.bpm, Some(126.0));
    assert_eq!(updated.title, "Night Drive");
}

#[tokio::test]
async fn blank_ids_are_rejected_before_any_call() {
    let (service, backend) = library(Vec::new());

    let error = service.delete_track("  ").await.unwrap_err();

    assert!(matches!(error, TrackVaultError::InvalidInput(_)));
    assert_eq!(backend.calls("delete_track"), 0);
    assert_eq!(service.layer().get_metrics().total_operations, 0);
}

#[tokio::test]
async fn playlists_round_trip_through_the_facade() {
    let (service, _) = library(vec![track("t1", "Night Drive")]);
    let created = service
        .create_playlist(&NewPlaylist { name: "Warmup".into(), track_ids: vec!["t1".into()] })
        .await
        .unwrap();

    let playlists = service.fetch_playlists().await.unwrap();
    assert_eq!(playlists, vec![created.clone()]);

    service.delete_playlist(&created.id).await.unwrap();
    assert!(service.fetch_playlists().await.unwrap().is_empty());

    let missing = service.delete_playlist(&created.id).await.unwrap_err();
    assert_eq!(missing.status_code(), Some(404));
}

#[tokio::test]
async fn empty_playlist_name_is_invalid() {
    let (service, _) = library(Vec::new());
    let result = service.create_playlist(&NewPlaylist { name: " ".into(), track_ids: Vec::new() }).await;
    assert!(matches!(result, Err(TrackVaultError::InvalidInput(_))));
}

#[tokio::test]
async fn search_trims_and_matches_titles() {
    let (service, backend) =
        library(vec![track("t1", "Night Drive"), track("t2", "Morning Light")]);

    let results = service.search_remote("  night ").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "t1");
    assert!(results[0].download_url.is_some());
    assert_eq!(backend.calls("search_remote"), 1);

    assert!(service.search_remote("").await.is_err());
    assert_eq!(backend.calls("search_remote"), 1);
}
