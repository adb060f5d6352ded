use std::sync::Arc;

use kino_core::{Dispatcher, PlaybackService};
use kino_model::TrackInfo;
use tokio::sync::watch;

use super::Projections;

/// One row in a track selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackItem {
    pub id: i32,
    pub text: String,
    pub is_selected: bool,
}

impl TrackItem {
    fn from_track(track: &TrackInfo, selected: i32) -> Self {
        Self {
            id: track.id,
            text: track.to_string(),
            is_selected: track.id == selected,
        }
    }
}

/// Audio and subtitle track menus, with selection markers kept in sync
/// with the adapter's reported selections.
pub struct TracksViewModel {
    playback: Arc<PlaybackService>,

    audio_items_tx: watch::Sender<Vec<TrackItem>>,
    subtitle_items_tx: watch::Sender<Vec<TrackItem>>,
    has_tracks_tx: watch::Sender<bool>,

    _projections: Projections,
}

impl TracksViewModel {
    /// # Panics
    ///
    /// Panics when constructed off the UI thread.
    pub fn new(dispatcher: &Dispatcher, playback: Arc<PlaybackService>) -> Self {
        dispatcher.assert_ui_thread();

        let audio_items_tx = watch::Sender::new(Vec::new());
        let subtitle_items_tx = watch::Sender::new(Vec::new());
        let has_tracks_tx = watch::Sender::new(false);

        // Four sources feed the menus, so a single rebuild task watches
        // them all instead of per-channel projections.
        let rebuild = dispatcher.spawn({
            let mut audio_rx = playback.audio_tracks();
            let mut subtitle_rx = playback.subtitle_tracks();
            let mut audio_sel_rx = playback.audio_track();
            let mut subtitle_sel_rx = playback.subtitle_track();
            let audio_items_tx = audio_items_tx.clone();
            let subtitle_items_tx = subtitle_items_tx.clone();
            let has_tracks_tx = has_tracks_tx.clone();
            async move {
                loop {
                    let audio_sel = *audio_sel_rx.borrow_and_update();
                    let subtitle_sel = *subtitle_sel_rx.borrow_and_update();
                    let audio: Vec<TrackItem> = audio_rx
                        .borrow_and_update()
                        .iter()
                        .map(|t| TrackItem::from_track(t, audio_sel))
                        .collect();
                    let subtitles: Vec<TrackItem> = subtitle_rx
                        .borrow_and_update()
                        .iter()
                        .map(|t| TrackItem::from_track(t, subtitle_sel))
                        .collect();

                    has_tracks_tx.send_replace(!audio.is_empty() || !subtitles.is_empty());
                    audio_items_tx.send_replace(audio);
                    subtitle_items_tx.send_replace(subtitles);

                    tokio::select! {
                        changed = audio_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        changed = subtitle_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        changed = audio_sel_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        changed = subtitle_sel_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self {
            playback,
            audio_items_tx,
            subtitle_items_tx,
            has_tracks_tx,
            _projections: Projections(vec![rebuild]),
        }
    }

    pub fn audio_items(&self) -> watch::Receiver<Vec<TrackItem>> {
        self.audio_items_tx.subscribe()
    }

    pub fn subtitle_items(&self) -> watch::Receiver<Vec<TrackItem>> {
        self.subtitle_items_tx.subscribe()
    }

    /// True when the current media exposes any selectable track.
    pub fn has_tracks(&self) -> watch::Receiver<bool> {
        self.has_tracks_tx.subscribe()
    }

    pub fn select_audio(&self, id: i32) -> bool {
        self.playback.set_audio_track(id)
    }

    pub fn select_subtitle(&self, id: i32) -> bool {
        self.playback.set_subtitle_track(id)
    }
}
