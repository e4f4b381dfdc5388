//! Playback backends.
//!
//! The controller drives exactly one backend at a time: a native audio
//! handle or an embedded video player. Both are reached through traits so
//! the host decides what actually produces sound. A `rodio` implementation
//! of the audio side ships with the crate.

mod error;
mod native;
mod signal;
mod sink;
mod types;

pub use error::BackendError;
pub use native::RodioEngine;
pub use signal::{BackendEvent, BackendSignal, EventSink, Generation, Waker};
pub use types::*;
