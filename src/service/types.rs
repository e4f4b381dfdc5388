use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::backend::{AudioEngine, VideoEngine};
use crate::observer::{Listener, SubscriptionId};
use crate::state::PlaybackState;

/// Builds the engines on the player thread. Audio output streams are
/// usually not `Send`, so only the factory crosses the thread boundary.
pub type EngineFactory =
    Box<dyn FnOnce() -> Result<Engines, crate::backend::BackendError> + Send + 'static>;

pub struct Engines {
    pub audio: Box<dyn AudioEngine>,
    pub video: Box<dyn VideoEngine>,
}

/// Messages accepted by the player thread.
pub enum PlayerCmd {
    Load(String),
    Add {
        url: String,
        title: Option<String>,
        thumbnail: Option<String>,
    },
    Remove(usize),
    Clear,
    PlayTrack(usize),
    Next,
    Previous,
    Toggle,
    ForcePlay,
    ToggleMute,
    ToggleLoop,
    ToggleAutoNext,
    SetVolume(u32),
    SeekTo(Duration),
    /// `None` seeks by the configured step.
    FastForward(Option<Duration>),
    Rewind(Option<Duration>),
    VideoApiReady,
    Subscribe(Listener, Sender<SubscriptionId>),
    Unsubscribe(SubscriptionId),
    Snapshot(Sender<PlaybackState>),
    /// A backend queued an event.
    Wake,
    Destroy,
}

impl std::fmt::Debug for PlayerCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerCmd::Load(url) => f.debug_tuple("Load").field(url).finish(),
            PlayerCmd::Add { url, .. } => f.debug_struct("Add").field("url", url).finish(),
            PlayerCmd::Remove(i) => f.debug_tuple("Remove").field(i).finish(),
            PlayerCmd::PlayTrack(i) => f.debug_tuple("PlayTrack").field(i).finish(),
            PlayerCmd::SetVolume(v) => f.debug_tuple("SetVolume").field(v).finish(),
            PlayerCmd::SeekTo(d) => f.debug_tuple("SeekTo").field(d).finish(),
            PlayerCmd::FastForward(d) => f.debug_tuple("FastForward").field(d).finish(),
            PlayerCmd::Rewind(d) => f.debug_tuple("Rewind").field(d).finish(),
            PlayerCmd::Unsubscribe(id) => f.debug_tuple("Unsubscribe").field(id).finish(),
            PlayerCmd::Clear => f.write_str("Clear"),
            PlayerCmd::Next => f.write_str("Next"),
            PlayerCmd::Previous => f.write_str("Previous"),
            PlayerCmd::Toggle => f.write_str("Toggle"),
            PlayerCmd::ForcePlay => f.write_str("ForcePlay"),
            PlayerCmd::ToggleMute => f.write_str("ToggleMute"),
            PlayerCmd::ToggleLoop => f.write_str("ToggleLoop"),
            PlayerCmd::ToggleAutoNext => f.write_str("ToggleAutoNext"),
            PlayerCmd::VideoApiReady => f.write_str("VideoApiReady"),
            PlayerCmd::Subscribe(..) => f.write_str("Subscribe"),
            PlayerCmd::Snapshot(_) => f.write_str("Snapshot"),
            PlayerCmd::Wake => f.write_str("Wake"),
            PlayerCmd::Destroy => f.write_str("Destroy"),
        }
    }
}
