//! Cooperative timers driven by an explicit clock.
//!
//! Nothing here sleeps. The owner passes `now` in, fires whatever is due and
//! asks for the next deadline to know how long it may block.

use std::time::{Duration, Instant};

/// A periodic timer with a single slot: starting it again replaces the old
/// schedule, so at most one ticker is ever running.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    ///
    /// Missed periods are coalesced into a single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.next_due = Some(next);
        true
    }
}

/// A one-shot timer carrying a payload. Arming it again replaces the pending one.
#[derive(Debug, Clone)]
pub struct Timeout<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for Timeout<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Timeout<T> {
    pub fn arm(&mut self, now: Instant, delay: Duration, payload: T) {
        self.pending = Some((now + delay, payload));
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, p)| p)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the payload if the timeout has expired at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((at, _)) if at <= now => self.pending.take().map(|(_, p)| p),
            _ => None,
        }
    }
}

/// Earliest of several optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_fires_once_per_period() {
        let t0 = Instant::now();
        let mut t = Ticker::new(Duration::from_secs(1));
        assert!(!t.poll(t0 + Duration::from_secs(5)));

        t.start(t0);
        assert!(!t.poll(t0 + Duration::from_millis(999)));
        assert!(t.poll(t0 + Duration::from_secs(1)));
        assert!(!t.poll(t0 + Duration::from_millis(1500)));
        assert!(t.poll(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn ticker_coalesces_missed_periods() {
        let t0 = Instant::now();
        let mut t = Ticker::new(Duration::from_secs(1));
        t.start(t0);
        assert!(t.poll(t0 + Duration::from_millis(3500)));
        assert!(!t.poll(t0 + Duration::from_millis(3600)));
        assert_eq!(t.deadline(), Some(t0 + Duration::from_millis(4500)));
    }

    #[test]
    fn restarting_ticker_replaces_schedule() {
        let t0 = Instant::now();
        let mut t = Ticker::new(Duration::from_secs(1));
        t.start(t0);
        t.start(t0 + Duration::from_millis(600));
        assert!(!t.poll(t0 + Duration::from_secs(1)));
        assert!(t.poll(t0 + Duration::from_millis(1600)));

        t.stop();
        assert!(!t.is_running());
        assert!(!t.poll(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn timeout_fires_once_with_payload() {
        let t0 = Instant::now();
        let mut to = Timeout::default();
        to.arm(t0, Duration::from_secs(1), "resume");
        assert_eq!(to.take_due(t0), None);
        assert_eq!(to.take_due(t0 + Duration::from_secs(1)), Some("resume"));
        assert_eq!(to.take_due(t0 + Duration::from_secs(2)), None);
        assert!(!to.is_armed());
    }

    #[test]
    fn earliest_skips_unset_deadlines() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(2);
        assert_eq!(earliest([None, Some(later), Some(t0)]), Some(t0));
        assert_eq!(earliest([None, None]), None);
    }
}
