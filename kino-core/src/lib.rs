//! kino-core: the headless services behind the player UI.
//!
//! The crate owns the media-engine adapter ([`playback::PlaybackService`]),
//! the playlist coordinator, the MRU tracker and the settings store. State
//! flows out of the services over `tokio::sync::watch` channels: push-based,
//! single-writer, replaying the latest value to new subscribers. Dropping a
//! receiver is the unsubscribe contract.

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod mru;
pub mod playback;
pub mod playlist;
pub mod settings;

pub use dispatch::Dispatcher;
pub use error::{CoreError, Result};
pub use mru::MruListService;
pub use playback::{PlaybackOptions, PlaybackService};
pub use playlist::PlaylistService;
pub use settings::{SettingsOptions, SettingsService};
