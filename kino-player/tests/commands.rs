mod support;

use std::sync::Arc;

use kino_core::engine::{HeadlessEngine, MediaEngine};
use kino_core::{PlaybackService, PlaylistService};
use kino_model::PlaybackState;
use kino_player::commands::{OpenMediaCommand, ToggleOutcome, TogglePlaybackCommand};
use tempfile::TempDir;

use support::{fast_options, media_file, media_info, playback_fixture, wait_for};

#[tokio::test]
async fn toggle_is_ignored_before_initialize() {
    let engine = Arc::new(HeadlessEngine::new());
    let playback = Arc::new(PlaybackService::new(
        Arc::clone(&engine) as Arc<dyn MediaEngine>,
        fast_options(),
    ));
    let toggle = TogglePlaybackCommand::new(playback);

    assert_eq!(toggle.execute(), ToggleOutcome::Ignored);
}

#[tokio::test]
async fn toggle_requests_open_when_nothing_is_loaded() {
    let (_dispatcher, _engine, playback) = playback_fixture();
    let toggle = TogglePlaybackCommand::new(Arc::clone(&playback));

    assert_eq!(toggle.execute(), ToggleOutcome::OpenRequested);
    assert_eq!(*playback.state().borrow(), PlaybackState::Closed);
}

#[tokio::test]
async fn toggle_restarts_from_stopped_and_toggles_while_active() {
    let (_dispatcher, engine, playback) = playback_fixture();
    let toggle = TogglePlaybackCommand::new(Arc::clone(&playback));

    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "short.mkv");
    engine.register_media(&path, media_info("Short", &[], &[]), 2);

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;

    assert_eq!(toggle.execute(), ToggleOutcome::Toggled);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Paused).await;

    // Run the media out so playback comes to rest.
    assert_eq!(toggle.execute(), ToggleOutcome::Toggled);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;
    engine.tick(2);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Stopped).await;

    assert_eq!(toggle.execute(), ToggleOutcome::Toggled);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;
}

#[tokio::test]
async fn open_with_no_paths_does_nothing() {
    let (_dispatcher, _engine, playback) = playback_fixture();
    let playlist = Arc::new(PlaylistService::new(Arc::clone(&playback)));
    let open = OpenMediaCommand::new(Arc::clone(&playback), playlist);

    assert!(!open.execute(&[]).await);
    assert_eq!(*playback.state().borrow(), PlaybackState::Closed);
}

#[tokio::test]
async fn open_with_one_path_loads_it_directly() {
    let (_dispatcher, engine, playback) = playback_fixture();
    let playlist = Arc::new(PlaylistService::new(Arc::clone(&playback)));
    let open = OpenMediaCommand::new(Arc::clone(&playback), Arc::clone(&playlist));

    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");
    engine.register_media(&path, media_info("Movie", &[], &[]), 60);

    let mut state_rx = playback.state();
    let mut items_rx = playlist.items();
    assert!(open.execute(&[path.clone()]).await);

    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;
    // The coordinator collapses to a singleton around the loaded file.
    let items = wait_for(&mut items_rx, |items| items.len() == 1).await;
    assert!(items.current().is_some_and(|f| f.matches_path(&path)));
}

#[tokio::test]
async fn open_with_many_paths_queues_them_and_plays_the_first() {
    let (_dispatcher, engine, playback) = playback_fixture();
    let playlist = Arc::new(PlaylistService::new(Arc::clone(&playback)));
    let open = OpenMediaCommand::new(Arc::clone(&playback), Arc::clone(&playlist));

    let dir = TempDir::new().unwrap();
    let a = media_file(&dir, "a.mkv");
    let b = media_file(&dir, "b.mkv");
    let c = media_file(&dir, "c.mkv");
    engine.register_media(&a, media_info("A", &[], &[]), 60);

    let mut state_rx = playback.state();
    let mut items_rx = playlist.items();
    assert!(open.execute(&[a.clone(), b, c]).await);

    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;
    let items = wait_for(&mut items_rx, |items| {
        items.len() == 3 && items.current_index() == Some(0)
    })
    .await;
    assert!(items.current().is_some_and(|f| f.matches_path(&a)));
    assert!(items.is_first_item());
    assert!(!items.is_last_item());
}
