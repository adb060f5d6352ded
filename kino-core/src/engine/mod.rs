//! The seam between the playback services and the embedded media engine.
//!
//! Everything above this module treats the engine as an opaque capability:
//! commands go in through [`MediaEngine`], state comes back out as
//! [`EngineEvent`]s on a broadcast feed. Real bindings (libVLC, GStreamer)
//! implement the trait; [`HeadlessEngine`] is the built-in stand-in that
//! answers commands with the matching events without decoding anything.

mod headless;

pub use headless::HeadlessEngine;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kino_model::TrackInfo;
use tokio::sync::broadcast;

use crate::error::EngineError;

/// Callbacks raised by the engine, translated to a neutral vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Opening,
    Playing,
    Paused,
    Stopped,
    EndReached,
    LengthChanged { seconds: i64 },
    TimeChanged { seconds: i64 },
    VolumeChanged { percent: i32 },
    MediaChanged { path: PathBuf },
}

/// What the engine learns about a file once parsing finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub audio_tracks: Vec<TrackInfo>,
    pub subtitle_tracks: Vec<TrackInfo>,
}

/// The narrow command surface of the embedded media engine.
///
/// Implementations own their threading; events may be emitted from any
/// thread. Callers must not assume a command's effect is visible before the
/// corresponding event arrives.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Subscribes to the engine's event feed.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;

    /// Parses a media file ahead of playback. Track lists and title are only
    /// as good as the engine's demuxer; failure is not fatal to playback.
    async fn parse(&self, path: &Path) -> Result<MediaInfo, EngineError>;

    /// Starts playing the given path, replacing any current media.
    fn play_path(&self, path: &Path) -> Result<(), EngineError>;

    fn play(&self) -> Result<(), EngineError>;

    fn pause(&self) -> Result<(), EngineError>;

    fn stop(&self) -> Result<(), EngineError>;

    /// Seeks to an absolute position in seconds.
    fn set_time(&self, seconds: i64) -> Result<(), EngineError>;

    /// Sets the output volume in percent (0-100).
    fn set_volume(&self, percent: i32) -> Result<(), EngineError>;

    fn set_audio_track(&self, id: i32) -> Result<(), EngineError>;

    fn set_subtitle_track(&self, id: i32) -> Result<(), EngineError>;

    /// Track ids the engine currently reports for the loaded media,
    /// including the synthetic disabled entry when tracks exist.
    fn audio_track_ids(&self) -> Vec<i32>;

    fn subtitle_track_ids(&self) -> Vec<i32>;

    fn current_audio_track(&self) -> i32;

    fn current_subtitle_track(&self) -> i32;
}
