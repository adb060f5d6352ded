//! The media engine adapter.
//!
//! Owns the engine instance and republishes its callbacks as watch channels.
//! Position and volume updates coming *from* the engine are coalesced within
//! a throttle window (most recent value wins); state transitions, duration
//! and track lists propagate immediately, since stop-at-end correctness
//! depends on them.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use kino_model::{FileItem, PlaybackState, TrackInfo};
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::engine::{EngineEvent, MediaEngine};

/// Tuning knobs for the adapter. Defaults match the observed behavior of the
/// reference player.
#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    /// Coalescing window for engine-driven position/volume updates.
    pub update_throttle: Duration,
    /// Seeks closer than this to the current position are rejected.
    pub seek_jitter_secs: i64,
    /// Pause between loading media and issuing play, letting the engine
    /// settle. Empirical, not a correctness mechanism.
    pub settle_delay: Duration,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            update_throttle: Duration::from_millis(200),
            seek_jitter_secs: 1,
            settle_delay: Duration::from_millis(500),
        }
    }
}

/// Wraps the media engine and projects its state onto watch channels.
///
/// Every mutating operation is guarded: before [`PlaybackService::initialize`]
/// runs, calls report failure instead of panicking, so command bindings fired
/// during startup race windows are safe.
pub struct PlaybackService {
    engine: Arc<dyn MediaEngine>,
    opts: PlaybackOptions,
    initialized: AtomicBool,
    last_set_position: Arc<Mutex<Option<i64>>>,
    pump: Mutex<Option<JoinHandle<()>>>,

    state_tx: watch::Sender<PlaybackState>,
    duration_tx: watch::Sender<i64>,
    position_tx: watch::Sender<i64>,
    volume_tx: watch::Sender<i32>,
    audio_tracks_tx: watch::Sender<Vec<TrackInfo>>,
    subtitle_tracks_tx: watch::Sender<Vec<TrackInfo>>,
    audio_track_tx: watch::Sender<i32>,
    subtitle_track_tx: watch::Sender<i32>,
    media_file_tx: watch::Sender<Option<FileItem>>,
    media_title_tx: watch::Sender<Option<String>>,
}

impl PlaybackService {
    pub fn new(engine: Arc<dyn MediaEngine>, opts: PlaybackOptions) -> Self {
        Self {
            engine,
            opts,
            initialized: AtomicBool::new(false),
            last_set_position: Arc::new(Mutex::new(None)),
            pump: Mutex::new(None),
            state_tx: watch::Sender::new(PlaybackState::NotInitialized),
            duration_tx: watch::Sender::new(0),
            position_tx: watch::Sender::new(0),
            volume_tx: watch::Sender::new(100),
            audio_tracks_tx: watch::Sender::new(Vec::new()),
            subtitle_tracks_tx: watch::Sender::new(Vec::new()),
            audio_track_tx: watch::Sender::new(-1),
            subtitle_track_tx: watch::Sender::new(-1),
            media_file_tx: watch::Sender::new(None),
            media_title_tx: watch::Sender::new(None),
        }
    }

    /// Spawns the event pump and transitions `NotInitialized -> Closed`.
    /// Idempotent. Must run inside a tokio runtime.
    pub fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Err(err) = self.engine.set_volume(100) {
            warn!(%err, "engine rejected initial volume");
        }

        let pump = Pump {
            engine: Arc::clone(&self.engine),
            opts: self.opts.clone(),
            last_set_position: Arc::clone(&self.last_set_position),
            state_tx: self.state_tx.clone(),
            duration_tx: self.duration_tx.clone(),
            position_tx: self.position_tx.clone(),
            volume_tx: self.volume_tx.clone(),
            audio_track_tx: self.audio_track_tx.clone(),
            subtitle_track_tx: self.subtitle_track_tx.clone(),
            media_file_tx: self.media_file_tx.clone(),
        };
        let events = self.engine.subscribe();
        *self.pump.lock() = Some(tokio::spawn(pump.run(events)));

        self.state_tx.send_replace(PlaybackState::Closed);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    // --- observable channels -------------------------------------------------

    pub fn state(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Media duration in seconds.
    pub fn duration(&self) -> watch::Receiver<i64> {
        self.duration_tx.subscribe()
    }

    /// Playback position in seconds.
    pub fn position(&self) -> watch::Receiver<i64> {
        self.position_tx.subscribe()
    }

    /// Volume in percent (0-100).
    pub fn volume(&self) -> watch::Receiver<i32> {
        self.volume_tx.subscribe()
    }

    pub fn audio_tracks(&self) -> watch::Receiver<Vec<TrackInfo>> {
        self.audio_tracks_tx.subscribe()
    }

    pub fn subtitle_tracks(&self) -> watch::Receiver<Vec<TrackInfo>> {
        self.subtitle_tracks_tx.subscribe()
    }

    /// Currently selected audio track id (-1 when disabled).
    pub fn audio_track(&self) -> watch::Receiver<i32> {
        self.audio_track_tx.subscribe()
    }

    pub fn subtitle_track(&self) -> watch::Receiver<i32> {
        self.subtitle_track_tx.subscribe()
    }

    /// The file the engine currently reports as loaded.
    pub fn media_file(&self) -> watch::Receiver<Option<FileItem>> {
        self.media_file_tx.subscribe()
    }

    /// Display title of the loaded media (metadata title or file name).
    pub fn media_title(&self) -> watch::Receiver<Option<String>> {
        self.media_title_tx.subscribe()
    }

    // --- commands ------------------------------------------------------------

    /// Loads a media file and starts playing it.
    ///
    /// Track lists and duration are populated asynchronously as the engine
    /// reports them; callers must not assume they are available on return.
    /// Returns false when the adapter is not initialized or the path does
    /// not point at an existing file.
    pub async fn load(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if !self.is_initialized() {
            return false;
        }
        if !path.is_file() {
            debug!(path = %path.display(), "load rejected: not a file");
            return false;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());

        match self.engine.parse(path).await {
            Ok(info) => {
                self.media_title_tx
                    .send_replace(info.title.clone().or(file_name));
                self.audio_tracks_tx
                    .send_replace(with_disabled_entry(info.audio_tracks));
                self.subtitle_tracks_tx
                    .send_replace(with_disabled_entry(info.subtitle_tracks));
            }
            Err(err) => {
                debug!(path = %path.display(), %err, "parse failed; playing without metadata");
                self.media_title_tx.send_replace(file_name);
                self.audio_tracks_tx.send_replace(Vec::new());
                self.subtitle_tracks_tx.send_replace(Vec::new());
            }
        }

        let _ = self.engine.set_time(0);
        self.position_tx.send_replace(0);
        self.media_file_tx.send_replace(Some(FileItem::new(path)));

        tokio::time::sleep(self.opts.settle_delay).await;

        self.engine.play_path(path).is_ok()
    }

    pub fn play(&self) {
        if self.is_initialized() {
            let _ = self.engine.play();
        }
    }

    pub fn pause(&self) {
        if self.is_initialized() {
            let _ = self.engine.pause();
        }
    }

    pub fn stop(&self) {
        if self.is_initialized() {
            let _ = self.engine.stop();
        }
    }

    /// Play when paused, pause when playing. No-op in any other state.
    pub fn toggle_playing(&self) {
        let state = *self.state_tx.borrow();
        if !self.is_initialized() || !state.is_active() {
            return;
        }
        if state == PlaybackState::Paused {
            self.play();
        } else {
            self.pause();
        }
    }

    /// Seeks to an absolute position in seconds, clamped to
    /// `[0, duration - 1]`. Positions within the jitter window of the
    /// current one are rejected without touching the engine.
    pub fn set_position(&self, position: i64) -> bool {
        if !self.is_initialized() {
            return false;
        }

        let duration = *self.duration_tx.borrow();
        let new_position = position.clamp(0, (duration - 1).max(0));

        if (new_position - *self.position_tx.borrow()).abs() < self.opts.seek_jitter_secs {
            return false;
        }

        *self.last_set_position.lock() = Some(new_position);
        if self.engine.set_time(new_position).is_err() {
            return false;
        }

        self.position_tx.send_replace(new_position);
        true
    }

    pub fn skip_back(&self, delta: Duration) -> bool {
        // Drop the watch read guard before set_position sends on the same channel.
        let position = *self.position_tx.borrow();
        self.set_position(position - delta.as_secs() as i64)
    }

    pub fn skip_forward(&self, delta: Duration) -> bool {
        let position = *self.position_tx.borrow();
        self.set_position(position + delta.as_secs() as i64)
    }

    /// Sets the volume, clamped to `[0, 100]`. The published value follows
    /// once the engine confirms the change.
    pub fn set_volume(&self, volume: i32) -> bool {
        if !self.is_initialized() {
            return false;
        }

        let new_volume = volume.clamp(0, 100);
        if *self.volume_tx.borrow() == new_volume {
            return false;
        }

        self.engine.set_volume(new_volume).is_ok()
    }

    /// Selects an audio track. Fails when the id is not in the engine's
    /// currently reported track list.
    pub fn set_audio_track(&self, id: i32) -> bool {
        if !self.is_initialized() || !self.engine.audio_track_ids().contains(&id) {
            return false;
        }
        if self.engine.set_audio_track(id).is_err() {
            return false;
        }
        self.audio_track_tx.send_replace(id);
        true
    }

    pub fn set_subtitle_track(&self, id: i32) -> bool {
        if !self.is_initialized() || !self.engine.subtitle_track_ids().contains(&id) {
            return false;
        }
        if self.engine.set_subtitle_track(id).is_err() {
            return false;
        }
        self.subtitle_track_tx.send_replace(id);
        true
    }
}

impl Drop for PlaybackService {
    fn drop(&mut self) {
        if let Some(handle) = self.pump.lock().take() {
            handle.abort();
        }
    }
}

fn with_disabled_entry(tracks: Vec<TrackInfo>) -> Vec<TrackInfo> {
    if tracks.is_empty() {
        tracks
    } else {
        std::iter::once(TrackInfo::disabled()).chain(tracks).collect()
    }
}

/// The engine-event pump. Runs until the engine drops its event feed.
struct Pump {
    engine: Arc<dyn MediaEngine>,
    opts: PlaybackOptions,
    last_set_position: Arc<Mutex<Option<i64>>>,
    state_tx: watch::Sender<PlaybackState>,
    duration_tx: watch::Sender<i64>,
    position_tx: watch::Sender<i64>,
    volume_tx: watch::Sender<i32>,
    audio_track_tx: watch::Sender<i32>,
    subtitle_track_tx: watch::Sender<i32>,
    media_file_tx: watch::Sender<Option<FileItem>>,
}

impl Pump {
    async fn run(self, mut events: broadcast::Receiver<EngineEvent>) {
        // Throttle state: latest pending value wins, flushed when the window
        // that opened with the first pending update elapses.
        let mut pending_position: Option<i64> = None;
        let mut pending_volume: Option<i32> = None;
        let mut flush_at: Option<Instant> = None;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => self.handle(
                        event,
                        &mut pending_position,
                        &mut pending_volume,
                        &mut flush_at,
                    ),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "engine event feed lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = sleep_until_or_forever(flush_at) => {
                    if let Some(position) = pending_position.take() {
                        self.position_tx.send_replace(position);
                    }
                    if let Some(volume) = pending_volume.take() {
                        self.volume_tx.send_replace(volume);
                    }
                    flush_at = None;
                }
            }
        }

        // Drain whatever the last window held.
        if let Some(position) = pending_position {
            self.position_tx.send_replace(position);
        }
        if let Some(volume) = pending_volume {
            self.volume_tx.send_replace(volume);
        }
    }

    fn handle(
        &self,
        event: EngineEvent,
        pending_position: &mut Option<i64>,
        pending_volume: &mut Option<i32>,
        flush_at: &mut Option<Instant>,
    ) {
        match event {
            EngineEvent::Opening => {
                self.state_tx.send_replace(PlaybackState::Opening);
            }
            EngineEvent::Playing => {
                self.state_tx.send_replace(PlaybackState::Playing);
                // Engine-side selection may have changed while stopped.
                self.audio_track_tx
                    .send_replace(self.engine.current_audio_track());
                self.subtitle_track_tx
                    .send_replace(self.engine.current_subtitle_track());
            }
            EngineEvent::Paused => {
                self.state_tx.send_replace(PlaybackState::Paused);
            }
            EngineEvent::Stopped => {
                self.state_tx.send_replace(PlaybackState::Stopped);
                *pending_position = None;
                *self.last_set_position.lock() = None;
                self.position_tx.send_replace(0);
            }
            EngineEvent::EndReached => {
                // Stop, not pause: the stop transition resets the position.
                if let Err(err) = self.engine.stop() {
                    warn!(%err, "engine stop after end-reached failed");
                }
            }
            EngineEvent::LengthChanged { seconds } => {
                self.duration_tx.send_replace(seconds);
            }
            EngineEvent::TimeChanged { seconds } => {
                // Ignore stale engine time until a just-issued seek is
                // confirmed back to us.
                let mut last_set = self.last_set_position.lock();
                match *last_set {
                    Some(target) if target != seconds => return,
                    _ => *last_set = None,
                }
                drop(last_set);

                *pending_position = Some(seconds);
                flush_at.get_or_insert(Instant::now() + self.opts.update_throttle);
            }
            EngineEvent::VolumeChanged { percent } => {
                if percent < 0 {
                    return;
                }
                *pending_volume = Some(percent);
                flush_at.get_or_insert(Instant::now() + self.opts.update_throttle);
            }
            EngineEvent::MediaChanged { path } => {
                self.media_file_tx.send_replace(Some(FileItem::new(path)));
            }
        }
    }
}

async fn sleep_until_or_forever(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
