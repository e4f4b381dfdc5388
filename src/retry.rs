//! Bounded retry policy.
//!
//! Backend readiness cannot be awaited directly, so the controller retries a
//! few times on a timer and then falls back. The policy lives here so its
//! budget can be tested without a controller.

use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Backoff {
    /// Every attempt waits the base delay.
    Fixed,
    /// Attempt `n` waits `delay * factor^(n-1)`.
    Exponential { factor: u32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts; `0` disables retrying.
    pub max_attempts: u32,
    /// Delay before the first attempt.
    pub delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Delay to wait before `attempt` (1-based), or `None` once the budget is spent.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        match self.backoff {
            Backoff::Fixed => Some(self.delay),
            Backoff::Exponential { factor } => {
                let mult = factor.max(1).saturating_pow(attempt - 1);
                Some(self.delay.saturating_mul(mult))
            }
        }
    }

    /// Sum of all delays; the longest a caller can wait before the fallback runs.
    pub fn total_budget(&self) -> Duration {
        (1..=self.max_attempts)
            .filter_map(|a| self.delay_for(a))
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(d))
    }

    pub fn start(self) -> Retry {
        Retry {
            policy: self,
            attempt: 0,
        }
    }
}

/// Progress through a [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retry {
    policy: RetryPolicy,
    attempt: u32,
}

impl Retry {
    /// Consume one attempt and return the delay to wait before it.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let d = self.policy.delay_for(self.attempt + 1)?;
        self.attempt += 1;
        Some(d)
    }

    /// Attempts scheduled so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.policy.max_attempts
    }
}
