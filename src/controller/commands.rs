//! Commands issued by callers.

use std::time::Duration;

use log::debug;

use crate::backend::Backend;
use crate::playlist::Track;
use crate::source::{SourceKind, classify, video_thumbnail};
use crate::state::PlayerPhase;

use super::PlaybackController;

impl PlaybackController {
    /// Load `url` into the matching backend without touching the playlist.
    pub fn load(&mut self, url: &str) {
        if self.destroyed {
            return;
        }
        self.load_source(url);
        self.broadcast();
    }

    /// Append a track. The first track of an empty playlist becomes current and is loaded.
    pub fn add_to_playlist(&mut self, url: &str, title: Option<&str>, thumbnail: Option<&str>) {
        if self.destroyed {
            return;
        }
        let track = self.new_track(url, title, thumbnail);
        if self.playlist.push(track) {
            self.load_source(url);
        }
        self.broadcast();
    }

    /// Remove the entry at `index`. Out of range is a no-op.
    ///
    /// The loaded source is left alone, even when it was the removed entry.
    pub fn remove_from_playlist(&mut self, index: usize) {
        if self.destroyed {
            return;
        }
        if self.playlist.remove(index).is_none() {
            debug!("remove_from_playlist: index {index} out of range");
            return;
        }
        self.broadcast();
    }

    /// Empty the playlist. Whatever is loaded keeps playing.
    pub fn clear_playlist(&mut self) {
        if self.destroyed {
            return;
        }
        self.playlist.clear();
        self.broadcast();
    }

    /// Jump to entry `index`, keeping the current play/pause intent.
    pub fn play_track(&mut self, index: usize) {
        if self.destroyed {
            return;
        }
        let Some(url) = self.playlist.select(index).map(|t| t.url.clone()) else {
            debug!("play_track: index {index} out of range");
            return;
        };
        self.switch_to(&url);
    }

    /// Move to the next entry, wrapping to the first.
    pub fn next_track(&mut self) {
        if self.destroyed {
            return;
        }
        let Some(url) = self.playlist.advance().map(|t| t.url.clone()) else {
            return;
        };
        self.switch_to(&url);
    }

    /// Move to the previous entry, wrapping to the last.
    pub fn previous_track(&mut self) {
        if self.destroyed {
            return;
        }
        let Some(url) = self.playlist.retreat().map(|t| t.url.clone()) else {
            return;
        };
        self.switch_to(&url);
    }

    /// Flip between playing and paused.
    ///
    /// Nothing happens without a backend. While the video player is still
    /// bootstrapping only the intent flips; it is honoured once the player is ready.
    pub fn toggle(&mut self) {
        if self.destroyed {
            return;
        }
        match self.backend {
            Backend::None => {
                debug!("toggle: nothing loaded");
                return;
            }
            Backend::Bootstrapping { .. } => {
                self.is_playing = !self.is_playing;
            }
            Backend::NativeAudio(_) | Backend::EmbeddedVideo(_) => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    self.play_backend();
                } else {
                    self.pause_backend();
                }
            }
        }
        self.broadcast();
    }

    /// Play whatever handle exists, ready or not.
    pub fn force_play(&mut self) {
        if self.destroyed {
            return;
        }
        if !self.backend.is_live() {
            debug!("force_play: no live backend");
            return;
        }
        self.is_playing = true;
        self.play_backend();
        self.broadcast();
    }

    pub fn toggle_mute(&mut self) {
        if self.destroyed {
            return;
        }
        self.muted = !self.muted;
        self.apply_mute();
        self.broadcast();
    }

    pub fn toggle_loop(&mut self) {
        if self.destroyed {
            return;
        }
        self.loop_enabled = !self.loop_enabled;
        self.broadcast();
    }

    pub fn toggle_auto_next(&mut self) {
        if self.destroyed {
            return;
        }
        self.auto_next = !self.auto_next;
        self.broadcast();
    }

    /// Set the volume in percent. Values above 100 are clamped.
    pub fn set_volume(&mut self, volume: u32) {
        if self.destroyed {
            return;
        }
        self.volume = volume.min(100) as u8;
        self.apply_volume();
        self.broadcast();
    }

    /// Seek the live backend. Without one this is a no-op.
    pub fn seek_to(&mut self, position: Duration) {
        if self.destroyed || !self.backend.is_live() {
            return;
        }
        self.seek_backend(position);
        self.broadcast();
    }

    /// Seek forward by `by`, never past a known duration.
    pub fn fast_forward(&mut self, by: Duration) {
        let target = self.clamp_to_duration(self.current_time.saturating_add(by));
        self.seek_to(target);
    }

    /// Seek backward by `by`, never before zero.
    pub fn rewind(&mut self, by: Duration) {
        let target = self.clamp_to_duration(self.current_time.saturating_sub(by));
        self.seek_to(target);
    }

    /// The embedded video library finished loading; create a pending player now.
    pub fn video_api_ready(&mut self) {
        if self.destroyed {
            return;
        }
        let Backend::Bootstrapping { video_id } = &self.backend else {
            return;
        };
        let video_id = video_id.clone();
        self.bootstrap.cancel();
        self.create_video(&video_id);
        self.broadcast();
    }

    /// Release the backend, stop every timer and drop all subscribers.
    ///
    /// Terminal: later commands are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        debug!("destroying playback controller");
        self.backend.release();
        self.sampler.stop();
        self.resume.cancel();
        self.bootstrap.cancel();
        self.subscribers.clear();
        self.is_playing = false;
        self.phase = PlayerPhase::Idle;
        self.destroyed = true;
    }

    /// A zero duration means the backend could not tell; leave `at` alone then.
    fn clamp_to_duration(&self, at: Duration) -> Duration {
        if self.duration.is_zero() {
            at
        } else {
            at.min(self.duration)
        }
    }

    fn new_track(&self, url: &str, title: Option<&str>, thumbnail: Option<&str>) -> Track {
        let title = title.map(str::trim).filter(|t| !t.is_empty());
        let thumbnail = thumbnail
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let display = &self.settings.display;

        match classify(url) {
            SourceKind::Video { id } => Track::new(
                url,
                title.unwrap_or(&display.video_title),
                thumbnail.or_else(|| Some(video_thumbnail(&id))),
            ),
            SourceKind::Audio => Track::new(url, title.unwrap_or(&display.audio_title), thumbnail),
        }
    }

    fn switch_to(&mut self, url: &str) {
        let was_playing = self.is_playing;
        debug!("switching to {url} (was playing: {was_playing})");
        self.load_source(url);
        if was_playing && !matches!(self.backend, Backend::None) {
            self.arm_resume();
        }
        self.broadcast();
    }
}
