mod support;

use std::time::Duration;

use kino_core::engine::EngineEvent;
use kino_model::{DISABLED_TRACK_ID, PlaybackState};
use tempfile::TempDir;

use support::{initialized_service, media_file, media_info, service, settle, wait_for};

#[tokio::test]
async fn mutators_refuse_before_initialize() {
    let (_engine, playback) = service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");

    assert!(!playback.load(&path).await);
    assert!(!playback.set_position(10));
    assert!(!playback.set_volume(50));
    assert!(!playback.set_audio_track(1));
    assert_eq!(*playback.state().borrow(), PlaybackState::NotInitialized);
}

#[tokio::test]
async fn initialize_transitions_to_closed_once() {
    let (_engine, playback) = initialized_service();
    assert_eq!(*playback.state().borrow(), PlaybackState::Closed);

    playback.initialize();
    assert_eq!(*playback.state().borrow(), PlaybackState::Closed);
}

#[tokio::test]
async fn load_rejects_missing_file() {
    let (_engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();

    assert!(!playback.load(dir.path().join("gone.mkv")).await);
    assert_eq!(*playback.state().borrow(), PlaybackState::Closed);
}

#[tokio::test]
async fn load_publishes_metadata_and_starts_playing() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");
    engine.register_media(
        &path,
        media_info("A Movie", &[(1, "Stereo")], &[(2, "English")]),
        120,
    );

    let mut state_rx = playback.state();
    let mut duration_rx = playback.duration();
    assert!(playback.load(&path).await);

    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;
    wait_for(&mut duration_rx, |d| *d == 120).await;

    assert_eq!(playback.media_title().borrow().as_deref(), Some("A Movie"));
    assert!(
        playback
            .media_file()
            .borrow()
            .as_ref()
            .is_some_and(|f| f.matches_path(&path))
    );

    let audio = playback.audio_tracks().borrow().clone();
    assert_eq!(audio.len(), 2);
    assert!(audio[0].is_disabled());
    assert_eq!(audio[1].id, 1);
}

#[tokio::test]
async fn parse_failure_falls_back_to_file_name() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "odd.bin");
    engine.fail_parse(&path);

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;

    assert_eq!(playback.media_title().borrow().as_deref(), Some("odd.bin"));
    assert!(playback.audio_tracks().borrow().is_empty());
    assert!(playback.subtitle_tracks().borrow().is_empty());
}

#[tokio::test]
async fn no_disabled_entry_without_real_tracks() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "plain.mkv");
    engine.register_media(&path, media_info("Plain", &[], &[]), 60);

    assert!(playback.load(&path).await);

    assert!(playback.audio_tracks().borrow().is_empty());
    assert!(playback.subtitle_tracks().borrow().is_empty());
}

#[tokio::test]
async fn volume_is_clamped_and_no_ops_on_equal_value() {
    let (_engine, playback) = initialized_service();
    let mut volume_rx = playback.volume();

    // Initial published volume is 100, so a clamped 150 is a no-op.
    assert!(!playback.set_volume(150));

    assert!(playback.set_volume(50));
    wait_for(&mut volume_rx, |v| *v == 50).await;

    assert!(playback.set_volume(150));
    wait_for(&mut volume_rx, |v| *v == 100).await;

    assert!(playback.set_volume(-10));
    wait_for(&mut volume_rx, |v| *v == 0).await;
}

#[tokio::test]
async fn seek_is_clamped_and_jitter_filtered() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");
    engine.register_media(&path, media_info("Movie", &[], &[]), 100);

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;

    assert!(playback.set_position(50));
    assert_eq!(*playback.position().borrow(), 50);

    // Within the jitter window of the current position.
    assert!(!playback.set_position(50));

    // Past the end clamps to duration - 1.
    assert!(playback.set_position(5000));
    assert_eq!(*playback.position().borrow(), 99);

    assert!(playback.set_position(-7));
    assert_eq!(*playback.position().borrow(), 0);
}

#[tokio::test]
async fn engine_time_is_ignored_until_a_seek_is_confirmed() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");
    engine.register_media(&path, media_info("Movie", &[], &[]), 100);

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;

    // The stale report is queued ahead of the seek echo; if it were not
    // filtered it would flush last and win.
    engine.emit(EngineEvent::TimeChanged { seconds: 10 });
    assert!(playback.set_position(50));
    settle().await;
    assert_eq!(*playback.position().borrow(), 50);

    // The pipeline is live again after the confirmation.
    let mut position_rx = playback.position();
    engine.emit(EngineEvent::TimeChanged { seconds: 60 });
    wait_for(&mut position_rx, |p| *p == 60).await;
}

#[tokio::test]
async fn time_updates_coalesce_within_the_throttle_window() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");
    engine.register_media(&path, media_info("Movie", &[], &[]), 100);

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;
    settle().await;

    let mut position_rx = playback.position();
    position_rx.mark_unchanged();

    for seconds in [5, 6, 7, 8] {
        engine.emit(EngineEvent::TimeChanged { seconds });
    }
    settle().await;

    // One flush with the most recent value, not four updates.
    assert!(position_rx.has_changed().unwrap());
    assert_eq!(*position_rx.borrow_and_update(), 8);
    assert!(!position_rx.has_changed().unwrap());
}

#[tokio::test]
async fn end_reached_stops_and_resets_position() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "short.mkv");
    engine.register_media(&path, media_info("Short", &[], &[]), 3);

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;

    engine.tick(3);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Stopped).await;
    assert_eq!(*playback.position().borrow(), 0);
}

#[tokio::test]
async fn toggle_only_acts_while_active() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");
    engine.register_media(&path, media_info("Movie", &[], &[]), 100);

    // Closed: nothing to toggle.
    playback.toggle_playing();
    assert_eq!(*playback.state().borrow(), PlaybackState::Closed);

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;

    playback.toggle_playing();
    wait_for(&mut state_rx, |s| *s == PlaybackState::Paused).await;
    playback.toggle_playing();
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;
}

#[tokio::test]
async fn track_selection_is_validated_against_the_engine() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");
    engine.register_media(
        &path,
        media_info("Movie", &[(1, "Stereo"), (2, "Surround")], &[]),
        100,
    );

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;

    // The engine defaults to the first real track once playing.
    let mut audio_rx = playback.audio_track();
    wait_for(&mut audio_rx, |id| *id == 1).await;

    assert!(!playback.set_audio_track(99));
    assert_eq!(*playback.audio_track().borrow(), 1);

    assert!(playback.set_audio_track(2));
    assert_eq!(*playback.audio_track().borrow(), 2);

    assert!(playback.set_audio_track(DISABLED_TRACK_ID));
    assert_eq!(*playback.audio_track().borrow(), DISABLED_TRACK_ID);

    // No subtitle tracks loaded, so nothing is selectable.
    assert!(!playback.set_subtitle_track(DISABLED_TRACK_ID));
}

#[tokio::test]
async fn skip_moves_relative_to_the_published_position() {
    let (engine, playback) = initialized_service();
    let dir = TempDir::new().unwrap();
    let path = media_file(&dir, "movie.mkv");
    engine.register_media(&path, media_info("Movie", &[], &[]), 100);

    let mut state_rx = playback.state();
    assert!(playback.load(&path).await);
    wait_for(&mut state_rx, |s| *s == PlaybackState::Playing).await;

    assert!(playback.set_position(50));
    assert!(playback.skip_forward(Duration::from_secs(10)));
    assert_eq!(*playback.position().borrow(), 60);
    assert!(playback.skip_back(Duration::from_secs(10)));
    assert_eq!(*playback.position().borrow(), 50);
}
