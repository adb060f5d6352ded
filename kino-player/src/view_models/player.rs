use std::sync::Arc;
use std::time::Duration;

use kino_core::{Dispatcher, PlaybackService};
use kino_model::{PlaybackState, TrackInfo};
use tokio::sync::watch;

use super::{Projections, UI_CONFLATE, project};

const SKIP_STEP: Duration = Duration::from_secs(10);

/// The top-level player projection: one bindable property per playback
/// channel, setters delegating back to the adapter.
pub struct PlayerViewModel {
    playback: Arc<PlaybackService>,
    service_volume: watch::Receiver<i32>,

    duration_tx: watch::Sender<i64>,
    position_tx: watch::Sender<i64>,
    volume_tx: watch::Sender<i32>,
    state_tx: watch::Sender<PlaybackState>,
    media_title_tx: watch::Sender<Option<String>>,
    audio_tracks_tx: watch::Sender<Vec<TrackInfo>>,
    subtitle_tracks_tx: watch::Sender<Vec<TrackInfo>>,

    _projections: Projections,
}

impl PlayerViewModel {
    /// # Panics
    ///
    /// Panics when constructed off the UI thread.
    pub fn new(dispatcher: &Dispatcher, playback: Arc<PlaybackService>) -> Self {
        dispatcher.assert_ui_thread();

        let duration_tx = watch::Sender::new(0);
        let position_tx = watch::Sender::new(0);
        let volume_tx = watch::Sender::new(100);
        let state_tx = watch::Sender::new(PlaybackState::NotInitialized);
        let media_title_tx = watch::Sender::new(None);
        let audio_tracks_tx = watch::Sender::new(Vec::new());
        let subtitle_tracks_tx = watch::Sender::new(Vec::new());

        let projections = Projections(vec![
            project(dispatcher, playback.duration(), duration_tx.clone(), None, |d| *d),
            project(dispatcher, playback.position(), position_tx.clone(), None, |p| *p),
            project(
                dispatcher,
                playback.volume(),
                volume_tx.clone(),
                Some(UI_CONFLATE),
                |v| *v,
            ),
            project(
                dispatcher,
                playback.state(),
                state_tx.clone(),
                Some(UI_CONFLATE),
                |s| *s,
            ),
            project(
                dispatcher,
                playback.media_title(),
                media_title_tx.clone(),
                None,
                |t| t.clone(),
            ),
            project(
                dispatcher,
                playback.audio_tracks(),
                audio_tracks_tx.clone(),
                None,
                |t| t.clone(),
            ),
            project(
                dispatcher,
                playback.subtitle_tracks(),
                subtitle_tracks_tx.clone(),
                None,
                |t| t.clone(),
            ),
        ]);

        Self {
            service_volume: playback.volume(),
            playback,
            duration_tx,
            position_tx,
            volume_tx,
            state_tx,
            media_title_tx,
            audio_tracks_tx,
            subtitle_tracks_tx,
            _projections: projections,
        }
    }

    pub fn duration(&self) -> watch::Receiver<i64> {
        self.duration_tx.subscribe()
    }

    pub fn position(&self) -> watch::Receiver<i64> {
        self.position_tx.subscribe()
    }

    pub fn volume(&self) -> watch::Receiver<i32> {
        self.volume_tx.subscribe()
    }

    pub fn state(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    pub fn media_title(&self) -> watch::Receiver<Option<String>> {
        self.media_title_tx.subscribe()
    }

    pub fn audio_tracks(&self) -> watch::Receiver<Vec<TrackInfo>> {
        self.audio_tracks_tx.subscribe()
    }

    pub fn subtitle_tracks(&self) -> watch::Receiver<Vec<TrackInfo>> {
        self.subtitle_tracks_tx.subscribe()
    }

    /// Two-way half of the volume binding.
    pub fn set_volume(&self, volume: i32) -> bool {
        self.playback.set_volume(volume)
    }

    /// Steps the volume to the next multiple of five in `direction`.
    pub fn adjust_volume(&self, direction: i32) -> bool {
        if direction == 0 {
            return false;
        }
        let current = *self.service_volume.borrow();
        self.playback
            .set_volume((current / 5) * 5 + direction.signum() * 5)
    }

    pub fn set_position(&self, position: i64) -> bool {
        self.playback.set_position(position)
    }

    pub fn skip_back(&self) -> bool {
        self.playback.skip_back(SKIP_STEP)
    }

    pub fn skip_forward(&self) -> bool {
        self.playback.skip_forward(SKIP_STEP)
    }

    pub fn select_audio_track(&self, id: i32) -> bool {
        self.playback.set_audio_track(id)
    }

    pub fn select_subtitle_track(&self, id: i32) -> bool {
        self.playback.set_subtitle_track(id)
    }
}
