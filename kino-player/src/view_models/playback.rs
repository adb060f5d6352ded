use std::sync::Arc;
use std::time::Duration;

use kino_core::{Dispatcher, PlaybackService};
use kino_model::PlaybackState;
use tokio::sync::watch;

use super::{Projections, UI_CONFLATE};

const SKIP_STEP: Duration = Duration::from_secs(10);

/// Boolean state flags plus the remaining-time countdown, the shape the
/// transport controls bind against.
pub struct PlaybackViewModel {
    playback: Arc<PlaybackService>,

    is_stopped_tx: watch::Sender<bool>,
    is_loading_tx: watch::Sender<bool>,
    is_playing_tx: watch::Sender<bool>,
    is_paused_tx: watch::Sender<bool>,
    is_active_tx: watch::Sender<bool>,
    remaining_time_tx: watch::Sender<i64>,

    _projections: Projections,
}

impl PlaybackViewModel {
    /// # Panics
    ///
    /// Panics when constructed off the UI thread.
    pub fn new(dispatcher: &Dispatcher, playback: Arc<PlaybackService>) -> Self {
        dispatcher.assert_ui_thread();

        let is_stopped_tx = watch::Sender::new(true);
        let is_loading_tx = watch::Sender::new(false);
        let is_playing_tx = watch::Sender::new(false);
        let is_paused_tx = watch::Sender::new(false);
        let is_active_tx = watch::Sender::new(false);
        let remaining_time_tx = watch::Sender::new(0);

        let flags = dispatcher.spawn({
            let mut state_rx = playback.state();
            let is_stopped_tx = is_stopped_tx.clone();
            let is_loading_tx = is_loading_tx.clone();
            let is_playing_tx = is_playing_tx.clone();
            let is_paused_tx = is_paused_tx.clone();
            let is_active_tx = is_active_tx.clone();
            async move {
                loop {
                    let state = *state_rx.borrow_and_update();
                    is_stopped_tx.send_replace(matches!(
                        state,
                        PlaybackState::Closed | PlaybackState::Opening | PlaybackState::Stopped
                    ));
                    is_loading_tx.send_replace(state == PlaybackState::Opening);
                    is_playing_tx.send_replace(state == PlaybackState::Playing);
                    is_paused_tx.send_replace(state == PlaybackState::Paused);
                    is_active_tx.send_replace(state.is_active());

                    if state_rx.changed().await.is_err() {
                        break;
                    }
                    tokio::time::sleep(UI_CONFLATE).await;
                }
            }
        });

        // Countdown derives from two channels, so it gets its own task
        // instead of a single-source projection.
        let countdown = dispatcher.spawn({
            let mut duration_rx = playback.duration();
            let mut position_rx = playback.position();
            let remaining_time_tx = remaining_time_tx.clone();
            async move {
                loop {
                    let duration = *duration_rx.borrow_and_update();
                    let position = *position_rx.borrow_and_update();
                    remaining_time_tx.send_replace((duration - position).max(0));

                    tokio::select! {
                        changed = duration_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        changed = position_rx.changed() => {
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
            is_stopped_tx,
            is_loading_tx,
            is_playing_tx,
            is_paused_tx,
            is_active_tx,
            remaining_time_tx,
            _projections: Projections(vec![flags, countdown]),
        }
    }

    /// True while nothing is loaded or playback has come to rest.
    pub fn is_stopped(&self) -> watch::Receiver<bool> {
        self.is_stopped_tx.subscribe()
    }

    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.is_loading_tx.subscribe()
    }

    pub fn is_playing(&self) -> watch::Receiver<bool> {
        self.is_playing_tx.subscribe()
    }

    pub fn is_paused(&self) -> watch::Receiver<bool> {
        self.is_paused_tx.subscribe()
    }

    /// True in the states where pause and seek make sense.
    pub fn is_active_playback(&self) -> watch::Receiver<bool> {
        self.is_active_tx.subscribe()
    }

    /// Seconds left until the end of the current media.
    pub fn remaining_time(&self) -> watch::Receiver<i64> {
        self.remaining_time_tx.subscribe()
    }

    pub fn toggle_playing(&self) {
        self.playback.toggle_playing();
    }

    pub fn stop(&self) {
        self.playback.stop();
    }

    pub fn skip_back(&self) -> bool {
        self.playback.skip_back(SKIP_STEP)
    }

    pub fn skip_forward(&self) -> bool {
        self.playback.skip_forward(SKIP_STEP)
    }
}
