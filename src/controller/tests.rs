use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::*;
use crate::backend::{
    AudioEngine, AudioHandle, BackendError, BackendEvent, EventSink, VideoEngine, VideoHandle,
};

const VIDEO_A: &str = "https://www.youtube.com/watch?v=aaaaaaaaaaa";
const AUDIO_B: &str = "/music/b.mp3";
const VIDEO_C: &str = "https://youtu.be/ccccccccccc";

#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
    sinks: Vec<EventSink>,
    live: usize,
    max_live: usize,
    video_available: bool,
    video_ready: bool,
    video_title: Option<String>,
    position: Duration,
}

type Shared = Arc<Mutex<Recorder>>;

fn acquire(rec: &Shared, call: String, events: EventSink) {
    let mut r = rec.lock().unwrap();
    r.calls.push(call);
    r.sinks.push(events);
    r.live += 1;
    r.max_live = r.max_live.max(r.live);
}

fn record(rec: &Shared, call: impl Into<String>) {
    rec.lock().unwrap().calls.push(call.into());
}

struct FakeAudioEngine(Shared);

impl AudioEngine for FakeAudioEngine {
    fn open(&mut self, url: &str, events: EventSink) -> Result<Box<dyn AudioHandle>, BackendError> {
        if url.contains("broken") {
            return Err(BackendError::Unsupported(url.to_string()));
        }
        acquire(&self.0, format!("audio.open {url}"), events);
        Ok(Box::new(FakeAudio(self.0.clone())))
    }
}

struct FakeAudio(Shared);

impl AudioHandle for FakeAudio {
    fn play(&mut self) {
        record(&self.0, "audio.play");
    }
    fn pause(&mut self) {
        record(&self.0, "audio.pause");
    }
    fn seek(&mut self, position: Duration) {
        record(&self.0, format!("audio.seek {}", position.as_secs()));
    }
    fn set_volume(&mut self, volume: f32) {
        record(&self.0, format!("audio.volume {volume:.2}"));
    }
    fn set_muted(&mut self, muted: bool) {
        record(&self.0, format!("audio.muted {muted}"));
    }
    fn position(&self) -> Duration {
        self.0.lock().unwrap().position
    }
}

impl Drop for FakeAudio {
    fn drop(&mut self) {
        let mut r = self.0.lock().unwrap();
        r.live -= 1;
        r.calls.push("audio.drop".into());
    }
}

struct FakeVideoEngine(Shared);

impl VideoEngine for FakeVideoEngine {
    fn is_available(&self) -> bool {
        self.0.lock().unwrap().video_available
    }

    fn create(
        &mut self,
        video_id: &str,
        events: EventSink,
    ) -> Result<Box<dyn VideoHandle>, BackendError> {
        acquire(&self.0, format!("video.create {video_id}"), events);
        Ok(Box::new(FakeVideo(self.0.clone())))
    }
}

struct FakeVideo(Shared);

impl VideoHandle for FakeVideo {
    fn play(&mut self) {
        record(&self.0, "video.play");
    }
    fn pause(&mut self) {
        record(&self.0, "video.pause");
    }
    fn seek(&mut self, position: Duration) {
        record(&self.0, format!("video.seek {}", position.as_secs()));
    }
    fn set_volume(&mut self, volume: u8) {
        record(&self.0, format!("video.volume {volume}"));
    }
    fn mute(&mut self) {
        record(&self.0, "video.mute");
    }
    fn unmute(&mut self) {
        record(&self.0, "video.unmute");
    }
    fn position(&self) -> Duration {
        self.0.lock().unwrap().position
    }
    fn duration(&self) -> Duration {
        Duration::from_secs(200)
    }
    fn title(&self) -> Option<String> {
        self.0.lock().unwrap().video_title.clone()
    }
    fn is_ready(&self) -> bool {
        self.0.lock().unwrap().video_ready
    }
    fn destroy(&mut self) {
        record(&self.0, "video.destroy");
    }
}

impl Drop for FakeVideo {
    fn drop(&mut self) {
        let mut r = self.0.lock().unwrap();
        r.live -= 1;
        r.calls.push("video.drop".into());
    }
}

struct Harness {
    ctl: PlaybackController,
    rec: Shared,
    states: Arc<Mutex<Vec<PlaybackState>>>,
    t0: Instant,
}

fn harness() -> Harness {
    harness_with(Settings::default(), true)
}

fn harness_with(settings: Settings, video_available: bool) -> Harness {
    let rec: Shared = Arc::new(Mutex::new(Recorder {
        video_available,
        ..Recorder::default()
    }));
    let mut ctl = PlaybackController::new(
        settings,
        Box::new(FakeAudioEngine(rec.clone())),
        Box::new(FakeVideoEngine(rec.clone())),
    );
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    ctl.subscribe(move |s: &PlaybackState| sink.lock().unwrap().push(s.clone()));
    let t0 = ctl.now();
    Harness {
        ctl,
        rec,
        states,
        t0,
    }
}

impl Harness {
    fn at_ms(&mut self, ms: u64) {
        self.ctl.tick(self.t0 + Duration::from_millis(ms));
    }

    /// Emit from the most recently acquired backend.
    fn emit(&self, event: BackendEvent) {
        let sink = self.rec.lock().unwrap().sinks.last().cloned().unwrap();
        sink.emit(event);
    }

    fn emit_and_apply(&mut self, event: BackendEvent) {
        self.emit(event);
        let now = self.ctl.now();
        self.ctl.tick(now);
    }

    fn last(&self) -> PlaybackState {
        self.states.lock().unwrap().last().cloned().unwrap()
    }

    fn broadcasts(&self) -> usize {
        self.states.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<String> {
        self.rec.lock().unwrap().calls.clone()
    }

    fn take_calls(&self) -> Vec<String> {
        std::mem::take(&mut self.rec.lock().unwrap().calls)
    }

    fn set_video_ready(&self, ready: bool) {
        self.rec.lock().unwrap().video_ready = ready;
    }

    fn set_position(&self, secs: u64) {
        self.rec.lock().unwrap().position = Duration::from_secs(secs);
    }

    fn abc(&mut self) {
        self.ctl.add_to_playlist(VIDEO_A, None, None);
        self.ctl.add_to_playlist(AUDIO_B, None, None);
        self.ctl.add_to_playlist(VIDEO_C, None, None);
    }
}

fn ready(secs: u64) -> BackendEvent {
    BackendEvent::Ready {
        duration: Duration::from_secs(secs),
        title: None,
    }
}

#[test]
fn first_added_track_becomes_current_and_loads() {
    let mut h = harness();
    h.ctl.add_to_playlist(AUDIO_B, None, None);

    let s = h.last();
    assert_eq!(h.broadcasts(), 1);
    assert_eq!(s.current_index, Some(0));
    assert_eq!(s.current_track_url, AUDIO_B);
    assert_eq!(s.playlist[0].title, "Audio File");
    assert_eq!(s.phase, PlayerPhase::Loading);
    assert!(matches!(h.ctl.backend(), Backend::NativeAudio(_)));

    h.ctl.add_to_playlist(VIDEO_C, Some("  "), None);
    let s = h.last();
    assert_eq!(s.current_index, Some(0));
    assert_eq!(s.playlist[1].title, "YouTube Video");
    assert_eq!(
        s.playlist[1].thumbnail.as_deref(),
        Some("https://img.youtube.com/vi/ccccccccccc/default.jpg")
    );
    assert_eq!(h.calls().iter().filter(|c| c.contains("open")).count(), 1);
}

#[test]
fn next_track_switches_backend_and_wraps() {
    let mut h = harness();
    h.abc();
    assert_eq!(h.last().current_index, Some(0));
    assert!(matches!(h.ctl.backend(), Backend::EmbeddedVideo(_)));

    h.take_calls();
    h.ctl.next_track();
    assert_eq!(h.last().current_index, Some(1));
    assert!(matches!(h.ctl.backend(), Backend::NativeAudio(_)));
    let calls = h.take_calls();
    let destroy = calls.iter().position(|c| c == "video.destroy").unwrap();
    let open = calls.iter().position(|c| c.starts_with("audio.open")).unwrap();
    assert!(destroy < open, "{calls:?}");

    h.ctl.next_track();
    assert_eq!(h.last().current_index, Some(2));
    h.ctl.next_track();
    assert_eq!(h.last().current_index, Some(0));
    assert_eq!(h.last().current_track_url, VIDEO_A);
}

#[test]
fn previous_track_wraps_to_last() {
    let mut h = harness();
    h.abc();
    h.ctl.previous_track();
    assert_eq!(h.last().current_index, Some(2));
    h.ctl.previous_track();
    assert_eq!(h.last().current_index, Some(1));
}

#[test]
fn navigation_on_empty_playlist_is_noop() {
    let mut h = harness();
    h.ctl.next_track();
    h.ctl.previous_track();
    h.ctl.play_track(0);
    assert_eq!(h.broadcasts(), 0);
    assert!(h.calls().is_empty());
}

#[test]
fn remove_reclamps_cursor_and_ignores_out_of_range() {
    let mut h = harness();
    h.abc();
    h.ctl.play_track(2);
    let before = h.broadcasts();

    h.ctl.remove_from_playlist(5);
    assert_eq!(h.broadcasts(), before);

    h.ctl.remove_from_playlist(2);
    let s = h.last();
    assert_eq!(s.playlist.len(), 2);
    assert_eq!(s.current_index, Some(1));

    h.ctl.remove_from_playlist(0);
    h.ctl.remove_from_playlist(0);
    assert_eq!(h.last().current_index, None);
}

#[test]
fn clear_playlist_keeps_loaded_source() {
    let mut h = harness();
    h.abc();
    h.ctl.clear_playlist();
    let s = h.last();
    assert!(s.playlist.is_empty());
    assert_eq!(s.current_index, None);
    assert!(matches!(h.ctl.backend(), Backend::EmbeddedVideo(_)));

    h.ctl.add_to_playlist(AUDIO_B, None, None);
    assert_eq!(h.last().current_index, Some(0));
    assert!(matches!(h.ctl.backend(), Backend::NativeAudio(_)));
}

#[test]
fn play_track_out_of_range_is_noop() {
    let mut h = harness();
    h.abc();
    let before = h.broadcasts();
    h.take_calls();
    h.ctl.play_track(3);
    assert_eq!(h.broadcasts(), before);
    assert!(h.calls().is_empty());
    assert_eq!(h.last().current_index, Some(0));
}

#[test]
fn never_more_than_one_live_handle() {
    let mut h = harness();
    h.abc();
    for _ in 0..5 {
        h.ctl.next_track();
        h.ctl.previous_track();
        h.ctl.play_track(1);
    }
    h.ctl.load(VIDEO_C);
    let r = h.rec.lock().unwrap();
    assert_eq!(r.max_live, 1);
    assert_eq!(r.live, 1);
}

#[test]
fn late_events_from_released_backend_are_ignored() {
    let mut h = harness();
    h.abc();
    let old_sink = h.rec.lock().unwrap().sinks[0].clone();

    h.ctl.next_track();
    let before = h.broadcasts();
    old_sink.emit(ready(999));
    old_sink.emit(BackendEvent::Ended);
    h.at_ms(10);

    assert_eq!(h.broadcasts(), before);
    let s = h.ctl.state();
    assert_eq!(s.current_index, Some(1));
    assert_eq!(s.duration, Duration::ZERO);
}

#[test]
fn video_ready_backfills_title_and_applies_settings() {
    let mut h = harness();
    h.rec.lock().unwrap().video_title = Some("Real Title".into());
    h.ctl.set_volume(40);
    h.ctl.toggle_mute();
    h.ctl.add_to_playlist(VIDEO_A, None, None);
    h.take_calls();

    h.emit_and_apply(ready(215));
    let s = h.last();
    assert_eq!(s.phase, PlayerPhase::Ready);
    assert_eq!(s.duration, Duration::from_secs(215));
    assert_eq!(s.current_title, "Real Title");
    assert_eq!(s.playlist[0].title, "Real Title");
    assert_eq!(
        s.current_thumbnail.as_deref(),
        Some("https://img.youtube.com/vi/aaaaaaaaaaa/default.jpg")
    );
    assert_eq!(h.calls(), vec!["video.volume 40", "video.mute"]);
}

#[test]
fn audio_ready_uses_tag_title_or_default() {
    let mut h = harness();
    h.ctl.load("/music/loose.mp3");
    h.emit_and_apply(ready(60));
    assert_eq!(h.last().current_title, "Audio File");
    assert!(h.last().current_thumbnail.is_some());

    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.emit_and_apply(BackendEvent::Ready {
        duration: Duration::from_secs(61),
        title: Some("Tagged".into()),
    });
    let s = h.last();
    assert_eq!(s.current_title, "Tagged");
    assert_eq!(s.playlist[0].title, "Tagged");
    assert_eq!(s.duration, Duration::from_secs(61));
}

#[test]
fn fast_forward_and_rewind_stay_within_duration() {
    let mut h = harness();
    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.emit_and_apply(ready(30));

    h.ctl.fast_forward(Duration::from_secs(20));
    assert_eq!(h.last().current_time, Duration::from_secs(20));
    h.ctl.fast_forward(Duration::from_secs(20));
    assert_eq!(h.last().current_time, Duration::from_secs(30));
    h.ctl.rewind(Duration::from_secs(45));
    assert_eq!(h.last().current_time, Duration::ZERO);
    h.ctl.rewind(Duration::from_secs(1));
    assert_eq!(h.last().current_time, Duration::ZERO);

    assert!(h.calls().contains(&"audio.seek 30".to_string()));
}

#[test]
fn seek_without_backend_is_noop() {
    let mut h = harness();
    h.ctl.seek_to(Duration::from_secs(5));
    h.ctl.fast_forward(Duration::from_secs(5));
    assert_eq!(h.broadcasts(), 0);
}

#[test]
fn set_volume_clamps_to_one_hundred() {
    let mut h = harness();
    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.take_calls();

    h.ctl.set_volume(150);
    assert_eq!(h.last().volume, 100);
    h.ctl.set_volume(25);
    assert_eq!(h.last().volume, 25);
    assert_eq!(h.calls(), vec!["audio.volume 1.00", "audio.volume 0.25"]);
}

#[test]
fn toggle_drives_audio_and_sampler() {
    let mut h = harness();
    h.ctl.toggle();
    assert_eq!(h.broadcasts(), 0);

    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.ctl.toggle();
    let s = h.last();
    assert!(s.is_playing);
    assert_eq!(s.phase, PlayerPhase::Playing);
    assert_eq!(h.ctl.next_deadline(), Some(h.t0 + Duration::from_secs(1)));

    h.set_position(1);
    h.at_ms(1000);
    assert_eq!(h.last().current_time, Duration::from_secs(1));

    h.ctl.toggle();
    let s = h.last();
    assert!(!s.is_playing);
    assert_eq!(s.phase, PlayerPhase::Paused);
    assert_eq!(h.ctl.next_deadline(), None);
    assert!(h.calls().ends_with(&["audio.play".to_string(), "audio.pause".to_string()]));
}

#[test]
fn video_state_changes_drive_sampler() {
    let mut h = harness();
    h.ctl.add_to_playlist(VIDEO_A, None, None);
    h.ctl.toggle();
    assert!(h.calls().contains(&"video.play".to_string()));
    // no sampler until the player confirms
    assert_eq!(h.ctl.next_deadline(), None);

    h.emit_and_apply(BackendEvent::Playing);
    h.emit_and_apply(BackendEvent::Playing);
    assert_eq!(h.ctl.next_deadline(), Some(h.t0 + Duration::from_secs(1)));

    h.set_position(7);
    let before = h.broadcasts();
    h.at_ms(1000);
    assert_eq!(h.broadcasts(), before + 1);
    assert_eq!(h.last().current_time, Duration::from_secs(7));

    h.emit_and_apply(BackendEvent::Paused);
    assert!(!h.last().is_playing);
    assert_eq!(h.ctl.next_deadline(), None);
}

#[test]
fn time_updates_are_mirrored() {
    let mut h = harness();
    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.emit_and_apply(BackendEvent::TimeUpdate(Duration::from_millis(2500)));
    assert_eq!(h.last().current_time, Duration::from_millis(2500));
}

#[test]
fn ended_with_loop_replays_same_track() {
    let mut h = harness();
    h.abc();
    h.ctl.next_track();
    h.ctl.toggle();
    h.ctl.toggle_loop();
    h.take_calls();

    h.emit_and_apply(BackendEvent::Ended);
    let s = h.last();
    assert_eq!(s.current_index, Some(1));
    assert!(s.is_playing);
    assert!(s.auto_next);
    assert_eq!(s.current_time, Duration::ZERO);
    assert_eq!(h.calls(), vec!["audio.seek 0", "audio.play"]);
}

#[test]
fn ended_with_auto_next_advances_and_resumes_within_budget() {
    let mut h = harness();
    h.abc();
    h.ctl.next_track();
    h.ctl.toggle();
    h.take_calls();

    h.emit_and_apply(BackendEvent::Ended);
    assert_eq!(h.last().current_index, Some(2));
    assert!(matches!(h.ctl.backend(), Backend::EmbeddedVideo(_)));

    // the player is still not ready at the first attempt
    h.at_ms(1000);
    assert!(!h.calls().contains(&"video.play".to_string()));

    // budget spent at the second attempt: playback is forced
    h.at_ms(2000);
    assert!(h.calls().contains(&"video.play".to_string()));
    assert!(h.last().is_playing);
    assert_eq!(h.ctl.next_deadline(), None);
}

#[test]
fn resume_plays_as_soon_as_video_is_ready() {
    let mut h = harness();
    h.abc();
    h.ctl.next_track();
    h.ctl.toggle();
    h.ctl.next_track();
    h.take_calls();

    h.set_video_ready(true);
    h.at_ms(1000);
    assert_eq!(h.calls(), vec!["video.play"]);
    assert_eq!(h.ctl.next_deadline(), None);
}

#[test]
fn resume_is_dropped_when_paused_meanwhile() {
    let mut h = harness();
    h.abc();
    h.ctl.next_track();
    h.ctl.toggle();
    h.ctl.next_track();
    h.ctl.toggle();
    h.take_calls();

    h.at_ms(1000);
    h.at_ms(2000);
    assert!(!h.calls().contains(&"video.play".to_string()));
    assert!(!h.last().is_playing);
}

#[test]
fn ended_without_loop_or_auto_next_stops() {
    let mut h = harness();
    h.ctl.toggle_auto_next();
    h.abc();
    h.ctl.next_track();
    h.emit_and_apply(ready(90));
    h.ctl.toggle();
    h.emit_and_apply(BackendEvent::Ended);

    let s = h.last();
    assert!(!s.is_playing);
    assert_eq!(s.phase, PlayerPhase::Ended);
    assert_eq!(s.current_index, Some(1));
    assert_eq!(h.ctl.next_deadline(), None);
}

#[test]
fn ended_with_auto_next_on_empty_playlist_stops() {
    let mut h = harness();
    h.ctl.load(AUDIO_B);
    h.ctl.toggle();
    h.emit_and_apply(BackendEvent::Ended);
    assert_eq!(h.last().phase, PlayerPhase::Ended);
    assert!(!h.last().is_playing);
}

#[test]
fn video_waits_for_player_library() {
    let mut h = harness_with(Settings::default(), false);
    h.ctl.add_to_playlist(VIDEO_A, None, None);
    assert!(matches!(h.ctl.backend(), Backend::Bootstrapping { .. }));
    assert_eq!(h.last().phase, PlayerPhase::Loading);

    // toggling only records intent while bootstrapping
    h.ctl.toggle();
    assert!(h.last().is_playing);
    assert!(h.calls().is_empty());

    h.at_ms(1000);
    assert!(matches!(h.ctl.backend(), Backend::Bootstrapping { .. }));

    h.rec.lock().unwrap().video_available = true;
    h.at_ms(2000);
    assert!(matches!(h.ctl.backend(), Backend::EmbeddedVideo(_)));

    // intent is honoured once the player is ready
    h.emit_and_apply(ready(100));
    assert!(h.calls().contains(&"video.play".to_string()));
}

#[test]
fn video_api_ready_short_circuits_bootstrap() {
    let mut h = harness_with(Settings::default(), false);
    h.ctl.add_to_playlist(VIDEO_A, None, None);
    h.ctl.video_api_ready();
    assert!(matches!(h.ctl.backend(), Backend::EmbeddedVideo(_)));
    assert_eq!(h.ctl.next_deadline(), None);
}

#[test]
fn bootstrap_gives_up_after_budget() {
    let mut settings = Settings::default();
    settings.timing.bootstrap_retry_attempts = 3;
    let mut h = harness_with(settings, false);
    h.ctl.add_to_playlist(VIDEO_A, None, None);

    for s in 1..=3 {
        h.at_ms(s * 1000);
    }
    assert!(matches!(h.ctl.backend(), Backend::None));
    let s = h.last();
    assert_eq!(s.phase, PlayerPhase::Idle);
    assert_eq!(s.current_index, Some(0));
    assert_eq!(h.ctl.next_deadline(), None);
}

#[test]
fn unrecognized_urls_fall_back_to_audio() {
    let mut h = harness();
    h.ctl.add_to_playlist("https://www.youtube.com/watch?v=bad", None, None);
    assert!(matches!(h.ctl.backend(), Backend::NativeAudio(_)));
    assert_eq!(h.last().playlist[0].title, "Audio File");
}

#[test]
fn failed_audio_open_leaves_controller_idle() {
    let mut h = harness();
    h.ctl.add_to_playlist("/music/broken.mp3", None, None);
    let s = h.last();
    assert!(matches!(h.ctl.backend(), Backend::None));
    assert_eq!(s.phase, PlayerPhase::Idle);
    assert_eq!(s.current_index, Some(0));

    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.ctl.next_track();
    assert!(matches!(h.ctl.backend(), Backend::NativeAudio(_)));
}

#[test]
fn each_command_broadcasts_once() {
    let mut h = harness();
    h.ctl.add_to_playlist(AUDIO_B, None, None);
    let mut expected = h.broadcasts();

    h.ctl.toggle_loop();
    expected += 1;
    assert_eq!(h.broadcasts(), expected);
    h.ctl.toggle_loop();
    expected += 1;
    h.ctl.toggle_auto_next();
    expected += 1;
    h.ctl.toggle_mute();
    expected += 1;
    h.ctl.set_volume(50);
    expected += 1;
    h.ctl.next_track();
    expected += 1;
    assert_eq!(h.broadcasts(), expected);

    let s = h.last();
    assert!(!s.loop_enabled);
    assert!(!s.auto_next);
    assert!(s.muted);
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let mut h = harness();
    let seen = Arc::new(Mutex::new(0usize));
    let counter = seen.clone();
    let id = h.ctl.subscribe(move |_| *counter.lock().unwrap() += 1);
    h.ctl.toggle_loop();
    assert!(h.ctl.unsubscribe(id));
    h.ctl.toggle_loop();
    assert_eq!(*seen.lock().unwrap(), 1);
}

#[test]
fn destroy_releases_everything_and_is_terminal() {
    let mut h = harness();
    h.abc();
    h.ctl.toggle();
    h.emit_and_apply(BackendEvent::Playing);
    h.take_calls();

    h.ctl.destroy();
    assert_eq!(h.calls(), vec!["video.destroy", "video.drop"]);
    assert_eq!(h.rec.lock().unwrap().live, 0);
    assert!(h.ctl.is_destroyed());
    assert_eq!(h.ctl.next_deadline(), None);

    let before = h.broadcasts();
    h.ctl.next_track();
    h.ctl.toggle();
    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.at_ms(5000);
    assert_eq!(h.broadcasts(), before);
    assert!(h.calls().is_empty());
}

#[test]
fn destroy_pauses_native_audio_before_release() {
    let mut h = harness();
    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.take_calls();
    drop(h.ctl);
    assert_eq!(
        h.rec.lock().unwrap().calls,
        vec!["audio.pause".to_string(), "audio.drop".to_string()]
    );
}

#[test]
fn seeking_with_unknown_duration_is_not_capped() {
    let mut h = harness();
    h.ctl.add_to_playlist(AUDIO_B, None, None);
    h.emit_and_apply(ready(0));
    h.emit_and_apply(BackendEvent::TimeUpdate(Duration::from_secs(40)));

    h.ctl.fast_forward(Duration::from_secs(10));
    assert_eq!(h.last().current_time, Duration::from_secs(50));
    assert!(h.calls().contains(&"audio.seek 50".to_string()));

    h.ctl.rewind(Duration::from_secs(5));
    assert_eq!(h.last().current_time, Duration::from_secs(45));
    h.ctl.rewind(Duration::from_secs(60));
    assert_eq!(h.last().current_time, Duration::ZERO);
}

#[test]
fn caller_thumbnail_wins_for_video_tracks() {
    let mut h = harness();
    h.ctl
        .add_to_playlist(VIDEO_A, Some("Clip"), Some("https://cdn.example/art.png"));
    let s = h.last();
    assert_eq!(s.current_thumbnail.as_deref(), Some("https://cdn.example/art.png"));
    assert_eq!(
        s.current_track().and_then(|t| t.thumbnail.clone()),
        s.current_thumbnail
    );
    assert_eq!(s.current_title, "Clip");

    // the player reports no title, so the caller's one stays
    h.emit_and_apply(ready(100));
    let s = h.last();
    assert_eq!(s.current_thumbnail.as_deref(), Some("https://cdn.example/art.png"));
    assert_eq!(s.current_title, "Clip");
    assert_eq!(s.playlist[0].title, "Clip");
}
