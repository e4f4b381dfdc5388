//! Reconciling backend events into controller state.

use std::time::Duration;

use log::{debug, trace};

use crate::backend::{Backend, BackendEvent};
use crate::state::PlayerPhase;

use super::PlaybackController;

impl PlaybackController {
    pub(super) fn drain_signals(&mut self) {
        while let Ok(signal) = self.signals_rx.try_recv() {
            if signal.generation != self.generation || !self.backend.is_live() {
                trace!("dropping stale backend event {:?}", signal.event);
                continue;
            }
            self.on_backend_event(signal.event);
        }
    }

    fn on_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Ready { duration, title } => self.on_ready(duration, title),
            BackendEvent::Playing => {
                self.is_playing = true;
                self.phase = PlayerPhase::Playing;
                self.sampler.start(self.now);
                self.broadcast();
            }
            BackendEvent::Paused => {
                self.is_playing = false;
                self.phase = PlayerPhase::Paused;
                self.sampler.stop();
                self.broadcast();
            }
            BackendEvent::Ended => self.on_ended(),
            BackendEvent::TimeUpdate(position) => {
                self.current_time = position;
                self.broadcast();
            }
        }
    }

    fn on_ready(&mut self, duration: Duration, title: Option<String>) {
        self.duration = duration;

        match &mut self.backend {
            Backend::EmbeddedVideo(h) => {
                // The player is fresh: push our volume and mute state into it.
                h.set_volume(self.volume);
                if self.muted {
                    h.mute();
                } else {
                    h.unmute();
                }
                if self.is_playing {
                    h.play();
                }
                let title = title
                    .or_else(|| h.title())
                    .unwrap_or_else(|| self.current_title.clone());
                if let Some(track) = self.playlist.find_for_update(&self.current_url) {
                    track.title = title.clone();
                }
                self.current_title = title;
                if self.phase != PlayerPhase::Playing {
                    self.phase = PlayerPhase::Ready;
                }
            }
            Backend::NativeAudio(_) => {
                match title {
                    Some(title) => {
                        if let Some(track) = self.playlist.find_for_update(&self.current_url) {
                            track.title = title.clone();
                        }
                        self.current_title = title;
                    }
                    None => {
                        if self.playlist.find(&self.current_url).is_none() {
                            self.current_title = self.settings.display.audio_title.clone();
                        }
                    }
                }
                let audio_thumbnail = &self.settings.display.audio_thumbnail;
                if let Some(track) = self.playlist.find_for_update(&self.current_url) {
                    track.thumbnail.get_or_insert_with(|| audio_thumbnail.clone());
                }
                if self.current_thumbnail.is_none() {
                    self.current_thumbnail = Some(audio_thumbnail.clone());
                }
                self.phase = if self.is_playing {
                    PlayerPhase::Playing
                } else {
                    PlayerPhase::Ready
                };
            }
            Backend::None | Backend::Bootstrapping { .. } => return,
        }

        debug!("ready: {} ({duration:?})", self.current_title);
        self.broadcast();
    }

    /// Loop first, then auto-advance, then stop.
    fn on_ended(&mut self) {
        if self.loop_enabled {
            debug!("ended, looping {}", self.current_url);
            self.seek_backend(Duration::ZERO);
            self.is_playing = true;
            self.play_backend();
            self.broadcast();
            return;
        }

        if self.auto_next && !self.playlist.is_empty() {
            debug!("ended, advancing");
            self.next_track();
            return;
        }

        debug!("ended, stopping");
        self.is_playing = false;
        self.sampler.stop();
        self.current_time = self.duration;
        self.phase = PlayerPhase::Ended;
        self.broadcast();
    }
}
