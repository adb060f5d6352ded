//! Composition root: builds the services, wires the cross-service
//! subscriptions and hands out view-models.

use std::path::PathBuf;
use std::sync::Arc;

use kino_core::{
    Dispatcher, MruListService, PlaybackOptions, PlaybackService, PlaylistService,
    SettingsOptions, SettingsService, engine::MediaEngine,
};
use tokio::task::JoinHandle;
use tracing::info;

use crate::commands::{OpenMediaCommand, TogglePlaybackCommand};
use crate::view_models::{
    MruListViewModel, PlaybackViewModel, PlayerViewModel, PlaylistViewModel, SettingsViewModel,
    TracksViewModel,
};

const SETTINGS_FILE: &str = "settings.json";
const MRU_FILE: &str = "mrulist.txt";

/// Everything a frontend binds against, owned for the life of the process.
pub struct App {
    pub dispatcher: Dispatcher,
    pub playback: Arc<PlaybackService>,
    pub playlist: Arc<PlaylistService>,
    pub mru: Arc<MruListService>,
    pub settings: Arc<SettingsService>,

    pub player: PlayerViewModel,
    pub playback_vm: PlaybackViewModel,
    pub tracks: TracksViewModel,
    pub playlist_vm: PlaylistViewModel,
    pub mru_vm: MruListViewModel,
    pub settings_vm: SettingsViewModel,

    pub open_media: OpenMediaCommand,
    pub toggle_playback: TogglePlaybackCommand,

    mru_follow: Option<JoinHandle<()>>,
}

impl App {
    /// Builds the full service graph on the current (UI) thread. Must run
    /// inside a current-thread runtime.
    pub fn new(engine: Arc<dyn MediaEngine>, data_dir: PathBuf) -> Self {
        let dispatcher = Dispatcher::new();

        let playback = Arc::new(PlaybackService::new(engine, PlaybackOptions::default()));
        let playlist = Arc::new(PlaylistService::new(Arc::clone(&playback)));
        let mru = Arc::new(MruListService::new(data_dir.join(MRU_FILE)));
        let settings = Arc::new(SettingsService::new(
            data_dir.join(SETTINGS_FILE),
            SettingsOptions::default(),
        ));

        playback.initialize();

        // Every successful load lands in the recent-files list, whatever
        // path it arrived by (dialog, playlist, MRU menu).
        let mru_follow = dispatcher.spawn({
            let mut media_rx = playback.media_file();
            let mru = Arc::clone(&mru);
            async move {
                loop {
                    if media_rx.changed().await.is_err() {
                        break;
                    }
                    let file = media_rx.borrow_and_update().clone();
                    if let Some(file) = file {
                        mru.add(file.full_path());
                    }
                }
            }
        });

        let player = PlayerViewModel::new(&dispatcher, Arc::clone(&playback));
        let playback_vm = PlaybackViewModel::new(&dispatcher, Arc::clone(&playback));
        let tracks = TracksViewModel::new(&dispatcher, Arc::clone(&playback));
        let playlist_vm =
            PlaylistViewModel::new(&dispatcher, Arc::clone(&playlist), Arc::clone(&playback));
        let mru_vm = MruListViewModel::new(&dispatcher, Arc::clone(&mru), Arc::clone(&playback));
        let settings_vm = SettingsViewModel::new(&dispatcher, Arc::clone(&settings));

        let open_media = OpenMediaCommand::new(Arc::clone(&playback), Arc::clone(&playlist));
        let toggle_playback = TogglePlaybackCommand::new(Arc::clone(&playback));

        info!(data_dir = %data_dir.display(), "application composed");

        Self {
            dispatcher,
            playback,
            playlist,
            mru,
            settings,
            player,
            playback_vm,
            tracks,
            playlist_vm,
            mru_vm,
            settings_vm,
            open_media,
            toggle_playback,
            mru_follow: Some(mru_follow),
        }
    }

    /// Flushes pending settings before the process exits.
    pub fn shutdown(&self) {
        if let Err(error) = self.settings.flush() {
            tracing::warn!(%error, "failed to flush settings on shutdown");
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.mru_follow.take() {
            handle.abort();
        }
    }
}
