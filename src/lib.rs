//! duoplay: one observable playback state over two backends.
//!
//! A [`PlaybackController`] drives either a native audio handle or an
//! embedded video player, keeps a linear playlist with auto-advance, and
//! broadcasts a full [`PlaybackState`] snapshot to its subscribers after
//! every change. [`PlayerService`] runs a controller on its own thread.

pub mod backend;
pub mod config;
pub mod controller;
pub mod observer;
pub mod playlist;
pub mod retry;
pub mod service;
pub mod source;
pub mod state;
pub mod timer;

pub use backend::{
    AudioEngine, AudioHandle, Backend, BackendError, BackendEvent, EventSink, RodioEngine,
    UnavailableVideo, VideoEngine, VideoHandle,
};
pub use config::Settings;
pub use controller::PlaybackController;
pub use observer::SubscriptionId;
pub use playlist::{Playlist, Track};
pub use service::{Engines, PlayerCmd, PlayerService};
pub use state::{PlaybackState, PlayerPhase};
