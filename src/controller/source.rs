//! Loading sources, acquiring backends and the retry loops around them.

use std::time::Duration;

use log::{debug, warn};

use crate::backend::Backend;
use crate::retry::Retry;
use crate::source::{SourceKind, classify, video_thumbnail};
use crate::state::PlayerPhase;

use super::PlaybackController;

impl PlaybackController {
    /// Tear down the current backend and acquire one for `url`. Does not broadcast.
    pub(super) fn load_source(&mut self, url: &str) {
        self.resume.cancel();
        self.bootstrap.cancel();
        self.backend.release();
        self.sampler.stop();
        self.current_time = Duration::ZERO;
        self.duration = Duration::ZERO;
        // Anything the old handle still sends is stale from here on.
        self.generation = self.generation.next();
        self.current_url = url.to_string();

        match classify(url) {
            SourceKind::Video { id } => {
                let mut thumbnail = video_thumbnail(&id);
                if let Some(track) = self.playlist.find_for_update(url) {
                    thumbnail = track.thumbnail.get_or_insert(thumbnail).clone();
                }
                self.current_title = self.placeholder_title(url, true);
                self.current_thumbnail = Some(thumbnail);

                if self.video.is_available() {
                    self.create_video(&id);
                } else {
                    debug!("video player library not ready, waiting to create {id}");
                    self.backend = Backend::Bootstrapping { video_id: id };
                    self.phase = PlayerPhase::Loading;
                    let mut retry = self.settings.timing.bootstrap_policy().start();
                    match retry.next_delay() {
                        Some(delay) => self.bootstrap.arm(self.now, delay, retry),
                        None => self.give_up_bootstrap(),
                    }
                }
            }
            SourceKind::Audio => {
                self.current_title = self.placeholder_title(url, false);
                self.current_thumbnail = self.playlist.find(url).and_then(|t| t.thumbnail.clone());
                self.open_audio(url);
            }
        }
    }

    fn placeholder_title(&self, url: &str, video: bool) -> String {
        match self.playlist.find(url) {
            Some(track) => track.title.clone(),
            None if video => self.settings.display.video_title.clone(),
            None => self.settings.display.audio_title.clone(),
        }
    }

    fn open_audio(&mut self, url: &str) {
        let events = self.event_sink();
        match self.audio.open(url, events) {
            Ok(mut handle) => {
                debug!("native audio opened: {url}");
                handle.set_volume(f32::from(self.volume) / 100.0);
                handle.set_muted(self.muted);
                self.backend = Backend::NativeAudio(handle);
                self.phase = PlayerPhase::Loading;
                if self.is_playing {
                    self.play_backend();
                }
            }
            Err(e) => {
                warn!("cannot open {url}: {e}");
                self.acquisition_failed();
            }
        }
    }

    pub(super) fn create_video(&mut self, video_id: &str) {
        let events = self.event_sink();
        match self.video.create(video_id, events) {
            Ok(handle) => {
                debug!("embedded video created: {video_id}");
                self.backend = Backend::EmbeddedVideo(handle);
                self.phase = PlayerPhase::Loading;
            }
            Err(e) => {
                warn!("cannot create video player for {video_id}: {e}");
                self.acquisition_failed();
            }
        }
    }

    fn acquisition_failed(&mut self) {
        self.backend = Backend::None;
        self.phase = PlayerPhase::Idle;
        self.is_playing = false;
    }

    pub(super) fn retry_bootstrap(&mut self, mut retry: Retry) {
        let Backend::Bootstrapping { video_id } = &self.backend else {
            return;
        };
        let video_id = video_id.clone();

        if self.video.is_available() {
            debug!("video player library ready after {} checks", retry.attempt());
            self.create_video(&video_id);
            self.broadcast();
            return;
        }

        match retry.next_delay() {
            Some(delay) => self.bootstrap.arm(self.now, delay, retry),
            None => {
                self.give_up_bootstrap();
                self.broadcast();
            }
        }
    }

    fn give_up_bootstrap(&mut self) {
        warn!("video player library never became available, dropping {}", self.current_url);
        self.acquisition_failed();
    }

    /// Start the bounded resume loop after a track switch.
    pub(super) fn arm_resume(&mut self) {
        let mut retry = self.settings.timing.resume_policy().start();
        if let Some(delay) = retry.next_delay() {
            self.resume.arm(self.now, delay, retry);
        }
    }

    /// One resume attempt: play a ready video or any audio handle, retry
    /// while budget remains, then force playback on whatever exists.
    pub(super) fn retry_resume(&mut self, mut retry: Retry) {
        if !self.is_playing {
            debug!("resume dropped: playback was paused meanwhile");
            return;
        }

        let ready = match &self.backend {
            Backend::EmbeddedVideo(h) => h.is_ready(),
            Backend::NativeAudio(_) => true,
            Backend::None | Backend::Bootstrapping { .. } => false,
        };
        if ready {
            debug!("resume: attempt {} played", retry.attempt());
            self.play_backend();
            self.broadcast();
            return;
        }

        match retry.next_delay() {
            Some(delay) => {
                debug!("resume: attempt {} found no ready backend", retry.attempt() - 1);
                self.resume.arm(self.now, delay, retry);
            }
            None => {
                debug!("resume: budget spent, forcing playback");
                self.force_play();
            }
        }
    }

    /// Issue play to the live backend. Native audio reports no state
    /// changes, so it is mirrored here; video is mirrored from its events.
    pub(super) fn play_backend(&mut self) {
        match &mut self.backend {
            Backend::NativeAudio(h) => {
                h.play();
                self.phase = PlayerPhase::Playing;
                self.sampler.start(self.now);
            }
            Backend::EmbeddedVideo(h) => h.play(),
            Backend::None | Backend::Bootstrapping { .. } => {}
        }
    }

    pub(super) fn pause_backend(&mut self) {
        match &mut self.backend {
            Backend::NativeAudio(h) => {
                h.pause();
                self.current_time = h.position();
                self.phase = PlayerPhase::Paused;
                self.sampler.stop();
            }
            Backend::EmbeddedVideo(h) => h.pause(),
            Backend::None | Backend::Bootstrapping { .. } => {}
        }
    }

    pub(super) fn seek_backend(&mut self, position: Duration) {
        match &mut self.backend {
            Backend::NativeAudio(h) => h.seek(position),
            Backend::EmbeddedVideo(h) => h.seek(position),
            Backend::None | Backend::Bootstrapping { .. } => return,
        }
        self.current_time = position;
    }

    pub(super) fn apply_volume(&mut self) {
        match &mut self.backend {
            Backend::NativeAudio(h) => h.set_volume(f32::from(self.volume) / 100.0),
            Backend::EmbeddedVideo(h) => h.set_volume(self.volume),
            Backend::None | Backend::Bootstrapping { .. } => {}
        }
    }

    pub(super) fn apply_mute(&mut self) {
        match &mut self.backend {
            Backend::NativeAudio(h) => h.set_muted(self.muted),
            Backend::EmbeddedVideo(h) if self.muted => h.mute(),
            Backend::EmbeddedVideo(h) => h.unmute(),
            Backend::None | Backend::Bootstrapping { .. } => {}
        }
    }
}
