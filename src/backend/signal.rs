//! Events flowing from backends back to the controller.
//!
//! Backends never call into the controller. They push tagged events into a
//! channel the controller drains on its next tick, so a handle that was
//! already torn down can still send without effect: its generation is stale.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

/// Acquisition counter. Every new backend handle gets a fresh one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// Metadata is known. `title` is `None` when the source carries none.
    Ready {
        duration: Duration,
        title: Option<String>,
    },
    Playing,
    Paused,
    Ended,
    /// Push-based position report.
    TimeUpdate(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendSignal {
    pub generation: Generation,
    pub event: BackendEvent,
}

/// Called after every emitted event so a sleeping driver can wake up.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Sending half handed to a backend when it is acquired.
#[derive(Clone)]
pub struct EventSink {
    generation: Generation,
    tx: Sender<BackendSignal>,
    waker: Option<Waker>,
}

impl EventSink {
    pub(crate) fn new(generation: Generation, tx: Sender<BackendSignal>, waker: Option<Waker>) -> Self {
        Self {
            generation,
            tx,
            waker,
        }
    }

    /// Queue `event` for the controller. Silently dropped once the controller is gone.
    pub fn emit(&self, event: BackendEvent) {
        let signal = BackendSignal {
            generation: self.generation,
            event,
        };
        if self.tx.send(signal).is_ok() {
            if let Some(wake) = &self.waker {
                wake();
            }
        }
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("generation", &self.generation)
            .field("waker", &self.waker.is_some())
            .finish()
    }
}
