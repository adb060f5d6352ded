use std::fmt;

/// Playback lifecycle as reported by the media engine.
///
/// Transitions originate only from engine callbacks; the adapter never forces
/// a state except that `Stopped` resets the published position to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    NotInitialized,
    Closed,
    Opening,
    Playing,
    Paused,
    Stopped,
}

impl PlaybackState {
    /// True while the engine holds media that can be toggled.
    pub fn is_active(self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "Playing"),
            PlaybackState::Paused => write!(f, "Paused"),
            PlaybackState::Stopped => write!(f, "Stopped"),
            _ => Ok(()),
        }
    }
}

/// Reserved id for the synthetic "Disabled" track entry.
pub const DISABLED_TRACK_ID: i32 = -1;

/// A single audio or subtitle track as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: i32,
    pub label: String,
    pub language: Option<String>,
}

impl TrackInfo {
    pub fn new(id: i32, label: impl Into<String>, language: Option<String>) -> Self {
        Self {
            id,
            label: label.into(),
            language,
        }
    }

    /// The synthetic entry prepended when at least one real track exists.
    pub fn disabled() -> Self {
        Self::new(DISABLED_TRACK_ID, "Disabled", None)
    }

    pub fn is_disabled(&self) -> bool {
        self.id == DISABLED_TRACK_ID
    }
}

impl fmt::Display for TrackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(lang) => write!(f, "{} [{lang}]", self.label),
            None => write!(f, "{}", self.label),
        }
    }
}
