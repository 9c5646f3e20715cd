//! Tick cadence and cooperative shutdown.
//!
//! The render loop never sleeps directly; it asks a [`Ticker`] for the next
//! tick. [`IntervalTicker`] keeps a wall-clock cadence, [`FixedTicks`] yields a
//! fixed number of ticks immediately so loops can be driven deterministically.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Process-wide stop flag. Clones share the same flag; waiters wake as soon
/// as it is raised.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block for up to `timeout`, returning early if the signal is raised.
    /// Returns `true` if the signal is raised.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Source of render ticks.
pub trait Ticker {
    /// Wait until the next tick is due. Returns `false` when no further tick
    /// will come, either because `stop` was raised or the ticker is exhausted.
    fn next_tick(&mut self, stop: &StopSignal) -> bool;
}

/// Ticks at a fixed minimum period. The first tick is immediate. When a tick
/// overruns, missed deadlines are dropped rather than replayed in a burst.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    next_due: Option<Instant>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Non-blocking form of [`Ticker::next_tick`]: if a tick is due at `now`,
    /// consume it and return `true`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due > now => false,
            Some(due) => {
                let mut next = due + self.period;
                if next <= now {
                    next = now + self.period;
                }
                self.next_due = Some(next);
                true
            }
            None => {
                self.next_due = Some(now + self.period);
                true
            }
        }
    }

    /// Time left until the next tick is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_due
            .map_or(Duration::ZERO, |due| due.saturating_duration_since(now))
    }
}

impl Ticker for IntervalTicker {
    fn next_tick(&mut self, stop: &StopSignal) -> bool {
        loop {
            if stop.is_stopped() {
                return false;
            }
            let now = Instant::now();
            if self.poll(now) {
                return true;
            }
            if stop.wait_timeout(self.until_next(now)) {
                return false;
            }
        }
    }
}

/// Yields `n` ticks back to back, then reports exhaustion.
#[derive(Debug, Clone)]
pub struct FixedTicks {
    remaining: usize,
}

impl FixedTicks {
    pub fn new(n: usize) -> Self {
        Self { remaining: n }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Ticker for FixedTicks {
    fn next_tick(&mut self, stop: &StopSignal) -> bool {
        if self.remaining == 0 || stop.is_stopped() {
            return false;
        }
        self.remaining -= 1;
        true
    }
}
