//! The broadcast snapshot.

use std::time::Duration;

use crate::playlist::Track;

/// Lifecycle of the currently loaded source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlayerPhase {
    /// No backend and nothing pending.
    #[default]
    Idle,
    /// A backend is being acquired or has not reported readiness yet.
    Loading,
    /// Duration is known; not playing yet.
    Ready,
    Playing,
    Paused,
    /// The source finished and nothing took over.
    Ended,
}

/// Full controller state handed to subscribers. Rebuilt on every change.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub phase: PlayerPhase,
    pub is_playing: bool,
    pub current_time: Duration,
    pub duration: Duration,
    /// 0..=100
    pub volume: u8,
    pub muted: bool,
    pub loop_enabled: bool,
    pub current_track_url: String,
    pub current_title: String,
    pub current_thumbnail: Option<String>,
    pub playlist: Vec<Track>,
    /// Cursor into `playlist`; `None` when nothing is selected.
    pub current_index: Option<usize>,
    pub auto_next: bool,
}

impl PlaybackState {
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.playlist.get(i))
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.current_time)
    }
}
