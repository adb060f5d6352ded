use std::path::Path;
use std::sync::Arc;

use kino_core::{Dispatcher, MruListService, PlaybackService};
use kino_model::FileItem;
use tokio::sync::watch;

use super::{Projections, project};

/// The recent-files menu: a straight projection of the tracker's list,
/// with open and remove actions.
pub struct MruListViewModel {
    mru: Arc<MruListService>,
    playback: Arc<PlaybackService>,

    items_tx: watch::Sender<Vec<FileItem>>,

    _projections: Projections,
}

impl MruListViewModel {
    /// # Panics
    ///
    /// Panics when constructed off the UI thread.
    pub fn new(
        dispatcher: &Dispatcher,
        mru: Arc<MruListService>,
        playback: Arc<PlaybackService>,
    ) -> Self {
        dispatcher.assert_ui_thread();

        let items_tx = watch::Sender::new(Vec::new());
        let projections = Projections(vec![project(
            dispatcher,
            mru.items(),
            items_tx.clone(),
            None,
            |items| items.clone(),
        )]);

        Self {
            mru,
            playback,
            items_tx,
            _projections: projections,
        }
    }

    pub fn items(&self) -> watch::Receiver<Vec<FileItem>> {
        self.items_tx.subscribe()
    }

    pub async fn open(&self, path: impl AsRef<Path>) -> bool {
        self.playback.load(path).await
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.mru.remove(path);
    }
}
