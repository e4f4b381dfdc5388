//! Native audio backend on top of `rodio`.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};

use super::error::BackendError;
use super::signal::{BackendEvent, EventSink};
use super::sink::{decode_at, local_path, probe_tags, requeue_at};
use super::types::{AudioEngine, AudioHandle};

const END_POLL: Duration = Duration::from_millis(200);

/// Opens local files on the default output device.
///
/// The output stream is not `Send` on every platform, so build the engine on
/// the thread that drives the controller.
pub struct RodioEngine {
    stream: OutputStream,
}

impl RodioEngine {
    pub fn open_default() -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; the host decides what to log.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioEngine for RodioEngine {
    fn open(&mut self, url: &str, events: EventSink) -> Result<Box<dyn AudioHandle>, BackendError> {
        let path = local_path(url)?;
        let source = decode_at(&path, Duration::ZERO)?;
        let (tag_duration, title) = probe_tags(&path);
        let duration = source
            .total_duration()
            .or(tag_duration)
            .unwrap_or(Duration::ZERO);

        let sink = Arc::new(Sink::connect_new(self.stream.mixer()));
        sink.append(source);
        sink.pause();

        debug!("rodio: opened {} ({:?})", path.display(), duration);
        events.emit(BackendEvent::Ready { duration, title });

        Ok(Box::new(RodioHandle::new(path, sink, events)))
    }
}

struct RodioHandle {
    path: PathBuf,
    sink: Arc<Sink>,
    volume: f32,
    muted: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    ended_reported: Arc<AtomicBool>,
    // Dropping the sender wakes the watcher and ends it.
    stop: Option<Sender<()>>,
    watcher: Option<JoinHandle<()>>,
}

impl RodioHandle {
    fn new(path: PathBuf, sink: Arc<Sink>, events: EventSink) -> Self {
        let (stop, stop_rx) = mpsc::channel();
        let ended_reported = Arc::new(AtomicBool::new(false));
        let watcher = spawn_end_watcher(sink.clone(), events, stop_rx, ended_reported.clone());
        Self {
            path,
            sink,
            volume: 1.0,
            muted: false,
            started_at: None,
            accumulated: Duration::ZERO,
            ended_reported,
            stop: Some(stop),
            watcher: Some(watcher),
        }
    }

    fn apply_gain(&self) {
        self.sink
            .set_volume(if self.muted { 0.0 } else { self.volume });
    }
}

impl AudioHandle for RodioHandle {
    fn play(&mut self) {
        if self.sink.empty() {
            // Finished sources are gone from the queue; restart from the top.
            self.seek(Duration::ZERO);
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    fn seek(&mut self, position: Duration) {
        let playing = self.started_at.is_some();
        if let Err(e) = requeue_at(&self.sink, &self.path, position) {
            warn!("rodio: seek failed: {e}");
            return;
        }
        self.accumulated = position;
        self.ended_reported.store(false, Ordering::SeqCst);
        if playing {
            self.started_at = Some(Instant::now());
            self.sink.play();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_gain();
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_gain();
    }

    fn position(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.stop.take();
        self.sink.stop();
        if let Some(h) = self.watcher.take() {
            let _ = h.join();
        }
    }
}

/// Report `Ended` once per playthrough when the sink drains while not paused.
fn spawn_end_watcher(
    sink: Arc<Sink>,
    events: EventSink,
    stop: Receiver<()>,
    ended_reported: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Err(RecvTimeoutError::Timeout) = stop.recv_timeout(END_POLL) {
            if !sink.is_paused() && sink.empty() && !ended_reported.swap(true, Ordering::SeqCst) {
                events.emit(BackendEvent::Ended);
            }
        }
    })
}
