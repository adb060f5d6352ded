//! Playlist coordination.
//!
//! The playlist follows the engine, not the other way around: navigation
//! requests only ask the adapter to load a neighbor, and the cursor moves
//! when the engine later reports the media change. That keeps the engine the
//! single source of truth and avoids cursor/engine desync.

use std::sync::Arc;
use std::time::Duration;

use kino_model::{FileItem, PlaylistItems};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::playback::PlaybackService;

const MEDIA_FOLLOW_DEBOUNCE: Duration = Duration::from_millis(200);

/// Maintains the active navigation list and its cursor, kept in sync with
/// whichever file the engine reports as loaded.
pub struct PlaylistService {
    playback: Arc<PlaybackService>,
    items_tx: watch::Sender<PlaylistItems>,
    current_tx: watch::Sender<Option<FileItem>>,
    follower: Mutex<Option<JoinHandle<()>>>,
}

impl PlaylistService {
    /// Must run inside a tokio runtime; spawns the media-follow task.
    pub fn new(playback: Arc<PlaybackService>) -> Self {
        let items_tx = watch::Sender::new(PlaylistItems::empty());
        let current_tx = watch::Sender::new(None);

        let follower = tokio::spawn(follow_media(
            playback.media_file(),
            items_tx.clone(),
            current_tx.clone(),
            MEDIA_FOLLOW_DEBOUNCE,
        ));

        Self {
            playback,
            items_tx,
            current_tx,
            follower: Mutex::new(Some(follower)),
        }
    }

    pub fn items(&self) -> watch::Receiver<PlaylistItems> {
        self.items_tx.subscribe()
    }

    pub fn current_item(&self) -> watch::Receiver<Option<FileItem>> {
        self.current_tx.subscribe()
    }

    /// Replaces the navigation list. The cursor confirms once the engine
    /// reports the corresponding media change.
    pub fn set_items(&self, items: PlaylistItems) {
        self.items_tx.send_replace(items);
    }

    /// Asks the adapter to load the item before the cursor. No-op at the
    /// first item or with no current item; the cursor itself is not moved
    /// here.
    pub async fn go_previous(&self) -> bool {
        let target = self.items_tx.borrow().previous().cloned();
        match target {
            Some(item) => self.playback.load(item.full_path()).await,
            None => false,
        }
    }

    /// Counterpart of [`PlaylistService::go_previous`].
    pub async fn go_next(&self) -> bool {
        let target = self.items_tx.borrow().next().cloned();
        match target {
            Some(item) => self.playback.load(item.full_path()).await,
            None => false,
        }
    }
}

impl Drop for PlaylistService {
    fn drop(&mut self) {
        if let Some(handle) = self.follower.lock().take() {
            handle.abort();
        }
    }
}

async fn follow_media(
    mut media_file: watch::Receiver<Option<FileItem>>,
    items_tx: watch::Sender<PlaylistItems>,
    current_tx: watch::Sender<Option<FileItem>>,
    debounce: Duration,
) {
    // The replayed current value is not a change; wait for real ones.
    media_file.mark_unchanged();

    loop {
        if media_file.changed().await.is_err() {
            break;
        }
        // Trailing debounce: a burst of changes collapses into the last one.
        loop {
            match tokio::time::timeout(debounce, media_file.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) | Err(_) => break,
            }
        }

        let next = media_file.borrow_and_update().clone();
        apply_media_change(next, &items_tx, &current_tx);
    }
}

fn apply_media_change(
    next: Option<FileItem>,
    items_tx: &watch::Sender<PlaylistItems>,
    current_tx: &watch::Sender<Option<FileItem>>,
) {
    let Some(item) = next else {
        items_tx.send_replace(PlaylistItems::empty());
        current_tx.send_replace(None);
        return;
    };

    let repositioned = items_tx.borrow().with_current(&item);
    match repositioned {
        Some(updated) => {
            // Known file: the cursor moves, the list stays.
            current_tx.send_replace(updated.current().cloned());
            items_tx.send_replace(updated);
        }
        None => {
            // A file outside the list collapses the playlist context.
            debug!(path = %item.full_path().display(), "playlist collapsed to loaded file");
            items_tx.send_replace(PlaylistItems::singleton(item.clone()));
            current_tx.send_replace(Some(item));
        }
    }
}
