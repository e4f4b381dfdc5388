//! Backend traits and the backend slot owned by the controller.

use std::time::Duration;

use super::error::BackendError;
use super::signal::EventSink;

/// A loaded native audio source.
///
/// Emits `Ready`, `TimeUpdate` and `Ended` through the sink it was opened
/// with. Dropping the handle releases it.
pub trait AudioHandle {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    /// Linear gain, 0.0..=1.0.
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    fn position(&self) -> Duration;
}

/// Opens native audio sources.
pub trait AudioEngine {
    fn open(&mut self, url: &str, events: EventSink) -> Result<Box<dyn AudioHandle>, BackendError>;
}

/// An embedded third-party video player.
///
/// Emits `Ready` once the player has bootstrapped, then `Playing`, `Paused`
/// and `Ended` state changes.
pub trait VideoHandle {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    /// Percent, 0..=100.
    fn set_volume(&mut self, volume: u8);
    fn mute(&mut self);
    fn unmute(&mut self);
    fn position(&self) -> Duration;
    fn duration(&self) -> Duration;
    fn title(&self) -> Option<String>;
    /// True once the player accepts playback commands.
    fn is_ready(&self) -> bool;
    /// Tear the player down. The handle is dropped right after.
    fn destroy(&mut self);
}

/// Creates embedded video players. The underlying library loads
/// asynchronously, so creation is only possible once `is_available` is true.
pub trait VideoEngine {
    fn is_available(&self) -> bool;
    fn create(&mut self, video_id: &str, events: EventSink)
    -> Result<Box<dyn VideoHandle>, BackendError>;
}

/// Video engine for hosts without an embedded player. Never becomes available.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableVideo;

impl VideoEngine for UnavailableVideo {
    fn is_available(&self) -> bool {
        false
    }

    fn create(
        &mut self,
        video_id: &str,
        _events: EventSink,
    ) -> Result<Box<dyn VideoHandle>, BackendError> {
        Err(BackendError::Unavailable(format!(
            "no embedded video player for {video_id}"
        )))
    }
}

/// The single backend slot.
#[derive(Default)]
pub enum Backend {
    #[default]
    None,
    /// A video is waiting for the player library; no handle exists yet.
    Bootstrapping { video_id: String },
    NativeAudio(Box<dyn AudioHandle>),
    EmbeddedVideo(Box<dyn VideoHandle>),
}

impl Backend {
    /// Whether a live handle exists.
    pub fn is_live(&self) -> bool {
        matches!(self, Backend::NativeAudio(_) | Backend::EmbeddedVideo(_))
    }

    pub fn position(&self) -> Option<Duration> {
        match self {
            Backend::NativeAudio(h) => Some(h.position()),
            Backend::EmbeddedVideo(h) => Some(h.position()),
            _ => None,
        }
    }

    /// Release whatever is held: native audio is paused, video is destroyed,
    /// then the handle is dropped.
    pub fn release(&mut self) {
        match std::mem::take(self) {
            Backend::NativeAudio(mut h) => h.pause(),
            Backend::EmbeddedVideo(mut h) => h.destroy(),
            Backend::None | Backend::Bootstrapping { .. } => {}
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::None => f.write_str("None"),
            Backend::Bootstrapping { video_id } => {
                f.debug_struct("Bootstrapping").field("video_id", video_id).finish()
            }
            Backend::NativeAudio(_) => f.write_str("NativeAudio"),
            Backend::EmbeddedVideo(_) => f.write_str("EmbeddedVideo"),
        }
    }
}
