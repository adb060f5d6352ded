#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use kino_core::engine::{HeadlessEngine, MediaEngine, MediaInfo};
use kino_core::{PlaybackOptions, PlaybackService};
use kino_model::TrackInfo;
use tempfile::TempDir;
use tokio::sync::watch;

/// Short windows so the suites run in milliseconds instead of wall time.
pub fn fast_options() -> PlaybackOptions {
    PlaybackOptions {
        update_throttle: Duration::from_millis(20),
        seek_jitter_secs: 1,
        settle_delay: Duration::from_millis(5),
    }
}

pub fn service() -> (Arc<HeadlessEngine>, PlaybackService) {
    let engine = Arc::new(HeadlessEngine::new());
    let playback = PlaybackService::new(
        Arc::clone(&engine) as Arc<dyn MediaEngine>,
        fast_options(),
    );
    (engine, playback)
}

pub fn initialized_service() -> (Arc<HeadlessEngine>, PlaybackService) {
    let (engine, playback) = service();
    playback.initialize();
    (engine, playback)
}

/// Creates an empty file standing in for a media file; `load` checks only
/// existence, the engine never reads it.
pub fn media_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"").unwrap();
    path
}

pub fn media_info(title: &str, audio: &[(i32, &str)], subtitles: &[(i32, &str)]) -> MediaInfo {
    let tracks = |specs: &[(i32, &str)]| {
        specs
            .iter()
            .map(|&(id, label)| TrackInfo::new(id, label, None))
            .collect()
    };
    MediaInfo {
        title: Some(title.to_owned()),
        audio_tracks: tracks(audio),
        subtitle_tracks: tracks(subtitles),
    }
}

/// Waits (bounded) until the channel holds a value matching the predicate.
pub async fn wait_for<T, F>(rx: &mut watch::Receiver<T>, pred: F) -> T
where
    T: Clone + Send + Sync,
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(pred))
        .await
        .expect("timed out waiting for channel value")
        .expect("channel closed while waiting")
        .clone()
}

/// Lets spawned pump/follower tasks observe whatever was just emitted.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
