//! Core data model definitions shared across kino crates.

pub mod files;
pub mod playback;
pub mod playlist;
pub mod settings;

// Intentionally curated re-exports for downstream consumers.
pub use files::FileItem;
pub use playback::{DISABLED_TRACK_ID, PlaybackState, TrackInfo};
pub use playlist::PlaylistItems;
pub use settings::{Settings, Theme};
