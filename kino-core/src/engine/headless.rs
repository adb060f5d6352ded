use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kino_model::{DISABLED_TRACK_ID, TrackInfo};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use super::{EngineEvent, MediaEngine, MediaInfo};
use crate::error::EngineError;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct MediaFixture {
    info: MediaInfo,
    duration: i64,
}

#[derive(Debug, Default)]
struct Inner {
    current: Option<PathBuf>,
    playing: bool,
    time: i64,
    duration: i64,
    audio_ids: Vec<i32>,
    subtitle_ids: Vec<i32>,
    current_audio: i32,
    current_subtitle: i32,
    library: HashMap<PathBuf, MediaFixture>,
    parse_failures: Vec<PathBuf>,
}

/// An engine that decodes nothing.
///
/// Commands are answered with the events a real engine would raise, so the
/// adapter and everything above it runs end-to-end without native bindings.
/// Media metadata comes from registered fixtures; unknown paths get a default
/// duration and no tracks. Also the scripted engine used by the test suites
/// (see [`HeadlessEngine::emit`]).
pub struct HeadlessEngine {
    tx: broadcast::Sender<EngineEvent>,
    inner: Mutex<Inner>,
    default_duration: i64,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tx,
            inner: Mutex::new(Inner::default()),
            default_duration: 60,
        }
    }

    /// Duration in seconds reported for paths without a registered fixture.
    pub fn with_default_duration(mut self, seconds: i64) -> Self {
        self.default_duration = seconds;
        self
    }

    /// Registers metadata to report for `path`.
    pub fn register_media(&self, path: impl Into<PathBuf>, info: MediaInfo, duration: i64) {
        self.inner
            .lock()
            .library
            .insert(path.into(), MediaFixture { info, duration });
    }

    /// Makes `parse` fail for `path` while leaving playback possible.
    pub fn fail_parse(&self, path: impl Into<PathBuf>) {
        self.inner.lock().parse_failures.push(path.into());
    }

    /// Injects a raw event into the feed, bypassing command handling.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }

    /// Advances playback time, raising `TimeChanged` and, when the media
    /// runs out, `EndReached`. No-op while paused or stopped.
    pub fn tick(&self, seconds: i64) {
        let reached_end = {
            let mut inner = self.inner.lock();
            if !inner.playing {
                return;
            }
            inner.time += seconds;
            let end = inner.duration > 0 && inner.time >= inner.duration;
            if !end {
                let _ = self.tx.send(EngineEvent::TimeChanged {
                    seconds: inner.time,
                });
            }
            end
        };
        if reached_end {
            self.emit(EngineEvent::EndReached);
        }
    }

    fn track_ids(info: &MediaInfo) -> (Vec<i32>, Vec<i32>) {
        let collect = |tracks: &[TrackInfo]| {
            if tracks.is_empty() {
                Vec::new()
            } else {
                std::iter::once(DISABLED_TRACK_ID)
                    .chain(tracks.iter().map(|t| t.id))
                    .collect()
            }
        };
        (collect(&info.audio_tracks), collect(&info.subtitle_tracks))
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaEngine for HeadlessEngine {
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    async fn parse(&self, path: &Path) -> Result<MediaInfo, EngineError> {
        let inner = self.inner.lock();
        if inner.parse_failures.iter().any(|p| p == path) {
            return Err(EngineError::Unsupported(path.display().to_string()));
        }
        Ok(inner
            .library
            .get(path)
            .map(|fixture| fixture.info.clone())
            .unwrap_or_default())
    }

    fn play_path(&self, path: &Path) -> Result<(), EngineError> {
        let (duration, events) = {
            let mut inner = self.inner.lock();
            let fixture = inner.library.get(path).cloned();
            let duration = fixture
                .as_ref()
                .map(|f| f.duration)
                .unwrap_or(self.default_duration);
            let (audio_ids, subtitle_ids) = fixture
                .as_ref()
                .map(|f| Self::track_ids(&f.info))
                .unwrap_or_default();

            inner.current = Some(path.to_path_buf());
            inner.playing = true;
            inner.time = 0;
            inner.duration = duration;
            inner.current_audio = *audio_ids.iter().find(|&&id| id != DISABLED_TRACK_ID).unwrap_or(&DISABLED_TRACK_ID);
            inner.current_subtitle = DISABLED_TRACK_ID;
            inner.audio_ids = audio_ids;
            inner.subtitle_ids = subtitle_ids;

            (
                duration,
                vec![
                    EngineEvent::Opening,
                    EngineEvent::MediaChanged {
                        path: path.to_path_buf(),
                    },
                ],
            )
        };

        debug!(path = %path.display(), duration, "headless engine opening media");
        for event in events {
            let _ = self.tx.send(event);
        }
        let _ = self.tx.send(EngineEvent::LengthChanged { seconds: duration });
        let _ = self.tx.send(EngineEvent::Playing);
        Ok(())
    }

    fn play(&self) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        if inner.current.is_none() {
            return Err(EngineError::NotReady);
        }
        inner.playing = true;
        let _ = self.tx.send(EngineEvent::Playing);
        Ok(())
    }

    fn pause(&self) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.playing = false;
        let _ = self.tx.send(EngineEvent::Paused);
        Ok(())
    }

    fn stop(&self) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.playing = false;
        inner.time = 0;
        let _ = self.tx.send(EngineEvent::Stopped);
        Ok(())
    }

    fn set_time(&self, seconds: i64) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.time = seconds;
        let _ = self.tx.send(EngineEvent::TimeChanged { seconds });
        Ok(())
    }

    fn set_volume(&self, percent: i32) -> Result<(), EngineError> {
        let _ = self.tx.send(EngineEvent::VolumeChanged { percent });
        Ok(())
    }

    fn set_audio_track(&self, id: i32) -> Result<(), EngineError> {
        self.inner.lock().current_audio = id;
        Ok(())
    }

    fn set_subtitle_track(&self, id: i32) -> Result<(), EngineError> {
        self.inner.lock().current_subtitle = id;
        Ok(())
    }

    fn audio_track_ids(&self) -> Vec<i32> {
        self.inner.lock().audio_ids.clone()
    }

    fn subtitle_track_ids(&self) -> Vec<i32> {
        self.inner.lock().subtitle_ids.clone()
    }

    fn current_audio_track(&self) -> i32 {
        self.inner.lock().current_audio
    }

    fn current_subtitle_track(&self) -> i32 {
        self.inner.lock().current_subtitle
    }
}
