use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::backend::Waker;
use crate::config::Settings;
use crate::controller::PlaybackController;

use super::types::{EngineFactory, PlayerCmd};

/// Upper bound on a single wait, so a clock that jumps is noticed.
const IDLE_WAIT: Duration = Duration::from_millis(500);

pub(super) fn spawn_player_thread(
    settings: Settings,
    engines: EngineFactory,
    tx: Sender<PlayerCmd>,
    rx: Receiver<PlayerCmd>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("duoplay-player".into())
        .spawn(move || {
            let engines = match engines() {
                Ok(engines) => engines,
                Err(e) => {
                    warn!("player thread cannot start: {e}");
                    return;
                }
            };

            // Backends wake the loop through the same channel commands use.
            let waker: Waker = Arc::new(move || {
                let _ = tx.send(PlayerCmd::Wake);
            });
            let mut ctl =
                PlaybackController::with_waker(settings, engines.audio, engines.video, Some(waker));

            loop {
                let timeout = ctl
                    .next_deadline()
                    .map(|at| at.saturating_duration_since(Instant::now()))
                    .unwrap_or(IDLE_WAIT)
                    .min(IDLE_WAIT);

                match rx.recv_timeout(timeout) {
                    Ok(PlayerCmd::Destroy) => {
                        debug!("player thread: destroy");
                        ctl.destroy();
                        break;
                    }
                    Ok(cmd) => apply(&mut ctl, cmd),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        ctl.destroy();
                        break;
                    }
                }

                ctl.tick(Instant::now());
            }
        })
}

fn apply(ctl: &mut PlaybackController, cmd: PlayerCmd) {
    let step = ctl.settings().playback.seek_step();
    match cmd {
        PlayerCmd::Load(url) => ctl.load(&url),
        PlayerCmd::Add {
            url,
            title,
            thumbnail,
        } => ctl.add_to_playlist(&url, title.as_deref(), thumbnail.as_deref()),
        PlayerCmd::Remove(i) => ctl.remove_from_playlist(i),
        PlayerCmd::Clear => ctl.clear_playlist(),
        PlayerCmd::PlayTrack(i) => ctl.play_track(i),
        PlayerCmd::Next => ctl.next_track(),
        PlayerCmd::Previous => ctl.previous_track(),
        PlayerCmd::Toggle => ctl.toggle(),
        PlayerCmd::ForcePlay => ctl.force_play(),
        PlayerCmd::ToggleMute => ctl.toggle_mute(),
        PlayerCmd::ToggleLoop => ctl.toggle_loop(),
        PlayerCmd::ToggleAutoNext => ctl.toggle_auto_next(),
        PlayerCmd::SetVolume(v) => ctl.set_volume(v),
        PlayerCmd::SeekTo(at) => ctl.seek_to(at),
        PlayerCmd::FastForward(by) => ctl.fast_forward(by.unwrap_or(step)),
        PlayerCmd::Rewind(by) => ctl.rewind(by.unwrap_or(step)),
        PlayerCmd::VideoApiReady => ctl.video_api_ready(),
        PlayerCmd::Subscribe(listener, reply) => {
            let _ = reply.send(ctl.subscribe(listener));
        }
        PlayerCmd::Unsubscribe(id) => {
            ctl.unsubscribe(id);
        }
        PlayerCmd::Snapshot(reply) => {
            let _ = reply.send(ctl.state());
        }
        // Queued events are applied by the tick that follows.
        PlayerCmd::Wake => {}
        PlayerCmd::Destroy => ctl.destroy(),
    }
}
