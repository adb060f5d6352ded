use std::sync::Arc;
use std::time::Duration;

use kino_core::{Dispatcher, PlaybackService, PlaylistService};
use kino_model::FileItem;
use tokio::sync::watch;

use super::{Projections, project};

/// Playlist rows change in bursts when a folder is queued, so they get a
/// tighter window than the other bindable properties.
const ITEMS_CONFLATE: Duration = Duration::from_millis(100);

/// One row in the playlist panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub file: FileItem,
    pub is_current: bool,
}

/// The playlist panel projection: rows with a current-item marker plus
/// the boundary flags the previous/next buttons bind against.
pub struct PlaylistViewModel {
    playlist: Arc<PlaylistService>,
    playback: Arc<PlaybackService>,

    entries_tx: watch::Sender<Vec<PlaylistEntry>>,
    has_items_tx: watch::Sender<bool>,
    is_first_tx: watch::Sender<bool>,
    is_last_tx: watch::Sender<bool>,

    _projections: Projections,
}

impl PlaylistViewModel {
    /// # Panics
    ///
    /// Panics when constructed off the UI thread.
    pub fn new(
        dispatcher: &Dispatcher,
        playlist: Arc<PlaylistService>,
        playback: Arc<PlaybackService>,
    ) -> Self {
        dispatcher.assert_ui_thread();

        let entries_tx = watch::Sender::new(Vec::new());
        let has_items_tx = watch::Sender::new(false);
        let is_first_tx = watch::Sender::new(false);
        let is_last_tx = watch::Sender::new(false);

        let items_rx = playlist.items();
        let projections = Projections(vec![
            project(
                dispatcher,
                items_rx.clone(),
                entries_tx.clone(),
                Some(ITEMS_CONFLATE),
                |items| {
                    let current = items.current_index();
                    items
                        .items()
                        .iter()
                        .enumerate()
                        .map(|(index, file)| PlaylistEntry {
                            file: file.clone(),
                            is_current: current == Some(index),
                        })
                        .collect()
                },
            ),
            project(
                dispatcher,
                items_rx.clone(),
                has_items_tx.clone(),
                Some(ITEMS_CONFLATE),
                |items| !items.is_empty(),
            ),
            project(
                dispatcher,
                items_rx.clone(),
                is_first_tx.clone(),
                Some(ITEMS_CONFLATE),
                |items| items.is_first_item(),
            ),
            project(
                dispatcher,
                items_rx,
                is_last_tx.clone(),
                Some(ITEMS_CONFLATE),
                |items| items.is_last_item(),
            ),
        ]);

        Self {
            playlist,
            playback,
            entries_tx,
            has_items_tx,
            is_first_tx,
            is_last_tx,
            _projections: projections,
        }
    }

    pub fn entries(&self) -> watch::Receiver<Vec<PlaylistEntry>> {
        self.entries_tx.subscribe()
    }

    pub fn has_items(&self) -> watch::Receiver<bool> {
        self.has_items_tx.subscribe()
    }

    pub fn is_first_item(&self) -> watch::Receiver<bool> {
        self.is_first_tx.subscribe()
    }

    pub fn is_last_item(&self) -> watch::Receiver<bool> {
        self.is_last_tx.subscribe()
    }

    /// Loads a row the user picked. The cursor follows once the engine
    /// reports the media change.
    pub async fn select(&self, entry: &PlaylistEntry) -> bool {
        self.playback.load(entry.file.full_path()).await
    }

    pub async fn go_previous(&self) -> bool {
        self.playlist.go_previous().await
    }

    pub async fn go_next(&self) -> bool {
        self.playlist.go_next().await
    }
}
