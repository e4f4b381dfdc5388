//! A playback controller running on its own thread.
//!
//! `PlayerService` is the handle other threads hold. Commands travel over an
//! `mpsc` channel; the thread sleeps until the next command, backend event or
//! timer deadline, whichever comes first.

use std::sync::mpsc::{self, SendError, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::Settings;
use crate::observer::SubscriptionId;
use crate::state::PlaybackState;

mod thread;
mod types;

pub use types::{EngineFactory, Engines, PlayerCmd};

use thread::spawn_player_thread;


pub struct PlayerService {
    tx: Sender<PlayerCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl PlayerService {
    /// Start the player thread. `engines` runs on that thread.
    pub fn spawn(settings: Settings, engines: EngineFactory) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let handle = spawn_player_thread(settings, engines, tx.clone(), rx)?;
        Ok(Self {
            tx,
            join: Mutex::new(Some(handle)),
        })
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    /// Register a listener. `None` once the thread has stopped.
    pub fn subscribe<F>(&self, listener: F) -> Option<SubscriptionId>
    where
        F: FnMut(&PlaybackState) + Send + 'static,
    {
        let (reply, rx) = mpsc::channel();
        self.send(PlayerCmd::Subscribe(Box::new(listener), reply)).ok()?;
        rx.recv().ok()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let _ = self.send(PlayerCmd::Unsubscribe(id));
    }

    /// Current state as seen by the player thread.
    pub fn snapshot(&self) -> Option<PlaybackState> {
        let (reply, rx) = mpsc::channel();
        self.send(PlayerCmd::Snapshot(reply)).ok()?;
        rx.recv().ok()
    }

    /// Like [`snapshot`](Self::snapshot), giving up after `timeout`.
    pub fn snapshot_timeout(&self, timeout: Duration) -> Option<PlaybackState> {
        let (reply, rx) = mpsc::channel();
        self.send(PlayerCmd::Snapshot(reply)).ok()?;
        rx.recv_timeout(timeout).ok()
    }

    /// Destroy the controller and wait for the thread to exit.
    pub fn shutdown(&self) {
        let _ = self.send(PlayerCmd::Destroy);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for PlayerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
