//! Bindable projections of the core services.
//!
//! Each view-model subscribes to service channels, re-publishes onto its own
//! watch channels (the "bindable properties") and exposes setters that
//! delegate back to the services. All projection tasks run on the UI
//! dispatcher; constructors assert thread affinity and panic off-thread.

mod mru_list;
mod playback;
mod player;
mod playlist;
mod settings;
mod tracks;

pub use mru_list::MruListViewModel;
pub use playback::PlaybackViewModel;
pub use player::PlayerViewModel;
pub use playlist::{PlaylistEntry, PlaylistViewModel};
pub use settings::SettingsViewModel;
pub use tracks::{TrackItem, TracksViewModel};

use std::time::Duration;

use kino_core::Dispatcher;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Conflation window applied to chatty channels before they reach bindable
/// properties, so bursts don't saturate the binding layer.
pub(crate) const UI_CONFLATE: Duration = Duration::from_millis(200);

/// Spawns a projection task: every change on `source` is mapped and
/// re-published on `target`. With a window, changes within it coalesce and
/// the most recent value wins. The task ends when the source closes.
pub(crate) fn project<S, T, F>(
    dispatcher: &Dispatcher,
    mut source: watch::Receiver<S>,
    target: watch::Sender<T>,
    window: Option<Duration>,
    map: F,
) -> JoinHandle<()>
where
    S: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
    F: Fn(&S) -> T + Send + 'static,
{
    dispatcher.spawn(async move {
        loop {
            let value = map(&source.borrow_and_update());
            target.send_replace(value);

            if source.changed().await.is_err() {
                break;
            }
            if let Some(window) = window {
                tokio::time::sleep(window).await;
            }
        }
    })
}

/// Aborts the held projection tasks when the owning view-model drops.
pub(crate) struct Projections(pub(crate) Vec<JoinHandle<()>>);

impl Drop for Projections {
    fn drop(&mut self) {
        for handle in self.0.drain(..) {
            handle.abort();
        }
    }
}
