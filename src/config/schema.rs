use std::time::Duration;

use serde::Deserialize;

use crate::retry::{Backoff, RetryPolicy};

/// Top-level controller settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/duoplay/config.toml` or `~/.config/duoplay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `DUOPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub timing: TimingSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume, 0..=100. Larger values are clamped.
    pub volume: u32,
    /// Whether the controller starts muted.
    pub muted: bool,
    /// Whether the current track repeats when it ends.
    pub loop_enabled: bool,
    /// Whether the next playlist entry starts when the current one ends.
    pub auto_next: bool,
    /// Step used by fast-forward / rewind when the caller gives none.
    pub seek_step_secs: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 100,
            muted: false,
            loop_enabled: false,
            auto_next: true,
            seek_step_secs: 10,
        }
    }
}

impl PlaybackSettings {
    pub fn seek_step(&self) -> Duration {
        Duration::from_secs(self.seek_step_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Period of the position sampler while playing (milliseconds).
    pub poll_interval_ms: u64,
    /// Delay before each attempt to resume playback after a track switch.
    pub resume_retry_delay_ms: u64,
    /// Number of resume attempts before forcing playback on whatever exists.
    pub resume_retry_attempts: u32,
    /// Delay between checks for the embedded video library.
    pub bootstrap_retry_delay_ms: u64,
    /// Number of checks before giving up on the embedded video library.
    pub bootstrap_retry_attempts: u32,
    /// How the retry delays grow between attempts.
    pub backoff: BackoffSetting,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            resume_retry_delay_ms: 1000,
            resume_retry_attempts: 2,
            bootstrap_retry_delay_ms: 1000,
            bootstrap_retry_attempts: 30,
            backoff: BackoffSetting::Fixed,
        }
    }
}

impl TimingSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn resume_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.resume_retry_attempts,
            delay: Duration::from_millis(self.resume_retry_delay_ms),
            backoff: self.backoff.into(),
        }
    }

    pub fn bootstrap_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.bootstrap_retry_attempts,
            delay: Duration::from_millis(self.bootstrap_retry_delay_ms),
            backoff: self.backoff.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackoffSetting {
    #[serde(alias = "constant")]
    Fixed,
    #[serde(alias = "exp", alias = "doubling")]
    Exponential,
}

impl From<BackoffSetting> for Backoff {
    fn from(s: BackoffSetting) -> Self {
        match s {
            BackoffSetting::Fixed => Backoff::Fixed,
            BackoffSetting::Exponential => Backoff::Exponential { factor: 2 },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Title used for audio sources that carry no title tag.
    pub audio_title: String,
    /// Title used for videos until the player reports the real one.
    pub video_title: String,
    /// Thumbnail shown for audio sources.
    pub audio_thumbnail: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            audio_title: "Audio File".to_string(),
            video_title: "YouTube Video".to_string(),
            audio_thumbnail: "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=100&h=100&fit=crop&crop=center".to_string(),
        }
    }
}
