//! Input-edge commands shared by menus, buttons and key bindings.

use std::path::PathBuf;
use std::sync::Arc;

use kino_core::{PlaybackService, PlaylistService};
use kino_model::{FileItem, PlaybackState, PlaylistItems};
use tracing::debug;

/// What a toggle request turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Nothing sensible to do in the current state.
    Ignored,
    /// Nothing is loaded; the caller should prompt for media to open.
    OpenRequested,
    /// Playback was started or toggled.
    Toggled,
}

/// Play/pause from the keyboard or the main button. With nothing loaded it
/// asks the caller to open media instead of silently doing nothing.
pub struct TogglePlaybackCommand {
    playback: Arc<PlaybackService>,
}

impl TogglePlaybackCommand {
    pub fn new(playback: Arc<PlaybackService>) -> Self {
        Self { playback }
    }

    pub fn execute(&self) -> ToggleOutcome {
        if !self.playback.is_initialized() {
            return ToggleOutcome::Ignored;
        }
        let state = *self.playback.state().borrow();
        match state {
            PlaybackState::NotInitialized | PlaybackState::Opening => ToggleOutcome::Ignored,
            PlaybackState::Closed => ToggleOutcome::OpenRequested,
            PlaybackState::Stopped => {
                self.playback.play();
                ToggleOutcome::Toggled
            }
            PlaybackState::Playing | PlaybackState::Paused => {
                self.playback.toggle_playing();
                ToggleOutcome::Toggled
            }
        }
    }
}

/// Opens one or more files, queueing the lot as a playlist when more than
/// one arrives (file dialog multi-select, drag and drop).
pub struct OpenMediaCommand {
    playback: Arc<PlaybackService>,
    playlist: Arc<PlaylistService>,
}

impl OpenMediaCommand {
    pub fn new(playback: Arc<PlaybackService>, playlist: Arc<PlaylistService>) -> Self {
        Self { playback, playlist }
    }

    /// Returns true when playback of the first file started.
    pub async fn execute(&self, paths: &[PathBuf]) -> bool {
        match paths {
            [] => false,
            [single] => self.playback.load(single).await,
            many => {
                debug!(count = many.len(), "queueing selection as playlist");
                let items = many.iter().map(FileItem::new).collect();
                self.playlist.set_items(PlaylistItems::new(0, items));
                self.playback.load(&many[0]).await
            }
        }
    }
}
