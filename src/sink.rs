//! Sample types and the pending queue that carries them from the ingestion
//! side to the render loop.
//!
//! A [`PendingQueue`] is the only structure shared between threads. Producers
//! push into it through cheap clones; the render loop swaps its contents out
//! once per tick with [`PendingQueue::take_all`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDateTime};

/// Stable name of a logical channel (for example an MQTT topic).
pub type ChannelId = String;

/// A single timestamped reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Timestamp as seconds since the Unix epoch, the x coordinate used for plotting.
    #[inline]
    pub fn x(&self) -> f64 {
        timestamp_to_secs(&self.timestamp)
    }

    #[inline]
    pub fn to_point(&self) -> PlotPoint {
        PlotPoint {
            x: self.x(),
            y: self.value,
        }
    }
}

/// A point on a plot: x is time in seconds since the epoch, y is the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

impl PlotPoint {
    /// Convert the x coordinate back into a timestamp.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        secs_to_timestamp(self.x)
    }

    #[inline]
    pub fn as_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Timestamps are naive; they are placed on the axis as if they were UTC.
pub fn timestamp_to_secs(ts: &NaiveDateTime) -> f64 {
    ts.and_utc().timestamp_micros() as f64 * 1e-6
}

pub fn secs_to_timestamp(secs: f64) -> Option<NaiveDateTime> {
    if !secs.is_finite() {
        return None;
    }
    let micros = (secs * 1e6).round() as i64;
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

/// Multi-writer / single-reader FIFO of samples waiting for the next drain.
#[derive(Clone, Default)]
pub struct PendingQueue {
    inner: Arc<Mutex<VecDeque<Sample>>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, sample: Sample) {
        self.lock().push_back(sample);
    }

    /// Move out everything enqueued so far. Samples pushed after the swap
    /// land in the fresh queue and are picked up by the next call.
    pub fn take_all(&self) -> VecDeque<Sample> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Samples are plain values; a panicking producer cannot leave the deque
    // in a torn state, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Sample>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
