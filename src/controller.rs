//! The playback controller.
//!
//! `PlaybackController` owns the single backend slot, the playlist and the
//! subscribers. It is a single-threaded state machine: commands mutate it
//! directly, and `tick` advances its clock, applies queued backend events and
//! fires due timers. Every state-changing command ends with one broadcast of
//! the full snapshot.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use log::trace;

use crate::backend::{
    AudioEngine, Backend, BackendSignal, EventSink, Generation, VideoEngine, Waker,
};
use crate::config::Settings;
use crate::observer::{Subscribers, SubscriptionId};
use crate::playlist::Playlist;
use crate::retry::Retry;
use crate::state::{PlaybackState, PlayerPhase};
use crate::timer::{Ticker, Timeout, earliest};

mod commands;
mod signals;
mod source;

#[cfg(test)]
mod tests;

pub struct PlaybackController {
    settings: Settings,
    audio: Box<dyn AudioEngine>,
    video: Box<dyn VideoEngine>,

    backend: Backend,
    generation: Generation,
    signals_tx: Sender<BackendSignal>,
    signals_rx: Receiver<BackendSignal>,
    waker: Option<Waker>,

    playlist: Playlist,
    current_url: String,
    current_title: String,
    current_thumbnail: Option<String>,

    phase: PlayerPhase,
    is_playing: bool,
    current_time: Duration,
    duration: Duration,
    volume: u8,
    muted: bool,
    loop_enabled: bool,
    auto_next: bool,

    sampler: Ticker,
    resume: Timeout<Retry>,
    bootstrap: Timeout<Retry>,

    subscribers: Subscribers,
    now: Instant,
    destroyed: bool,
}

impl PlaybackController {
    pub fn new(settings: Settings, audio: Box<dyn AudioEngine>, video: Box<dyn VideoEngine>) -> Self {
        Self::with_waker(settings, audio, video, None)
    }

    /// Like `new`, with a callback invoked whenever a backend queues an event.
    pub fn with_waker(
        settings: Settings,
        audio: Box<dyn AudioEngine>,
        video: Box<dyn VideoEngine>,
        waker: Option<Waker>,
    ) -> Self {
        let (signals_tx, signals_rx) = mpsc::channel();
        let sampler = Ticker::new(settings.timing.poll_interval());
        Self {
            volume: settings.playback.volume.min(100) as u8,
            muted: settings.playback.muted,
            loop_enabled: settings.playback.loop_enabled,
            auto_next: settings.playback.auto_next,
            settings,
            audio,
            video,

            backend: Backend::None,
            generation: Generation::default(),
            signals_tx,
            signals_rx,
            waker,

            playlist: Playlist::new(),
            current_url: String::new(),
            current_title: String::new(),
            current_thumbnail: None,

            phase: PlayerPhase::Idle,
            is_playing: false,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,

            sampler,
            resume: Timeout::default(),
            bootstrap: Timeout::default(),

            subscribers: Subscribers::default(),
            now: Instant::now(),
            destroyed: false,
        }
    }

    /// Register `listener`; it receives every snapshot from now on.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackState) + Send + 'static,
    {
        self.subscribers.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            phase: self.phase,
            is_playing: self.is_playing,
            current_time: self.current_time,
            duration: self.duration,
            volume: self.volume,
            muted: self.muted,
            loop_enabled: self.loop_enabled,
            current_track_url: self.current_url.clone(),
            current_title: self.current_title.clone(),
            current_thumbnail: self.current_thumbnail.clone(),
            playlist: self.playlist.tracks().to_vec(),
            current_index: self.playlist.cursor(),
            auto_next: self.auto_next,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The controller's notion of the current time (last `tick`).
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advance the clock to `now`, apply queued backend events and fire due timers.
    pub fn tick(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        self.now = self.now.max(now);
        self.drain_signals();
        self.fire_timers();
    }

    /// When the next timer is due, if any is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.destroyed {
            return None;
        }
        earliest([
            self.sampler.deadline(),
            self.resume.deadline(),
            self.bootstrap.deadline(),
        ])
    }

    fn fire_timers(&mut self) {
        let now = self.now;
        if let Some(retry) = self.bootstrap.take_due(now) {
            self.retry_bootstrap(retry);
        }
        if let Some(retry) = self.resume.take_due(now) {
            self.retry_resume(retry);
        }
        if self.sampler.poll(now) {
            self.sample_position();
        }
    }

    fn sample_position(&mut self) {
        if let Some(position) = self.backend.position() {
            trace!("sampler: {position:?}");
            self.current_time = position;
            self.broadcast();
        }
    }

    fn event_sink(&self) -> EventSink {
        EventSink::new(self.generation, self.signals_tx.clone(), self.waker.clone())
    }

    fn broadcast(&mut self) {
        let state = self.state();
        self.subscribers.notify(&state);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.destroy();
    }
}
