//! Bounded per-channel history.

use std::collections::VecDeque;

use crate::sink::{PlotPoint, Sample};

/// Default number of samples retained per channel.
pub const DEFAULT_WINDOW_CAPACITY: usize = 100;

/// Fixed-capacity FIFO of the most recently drained samples of one channel.
///
/// Appending beyond capacity evicts exactly the oldest sample. Timestamps are
/// stored as received; ordering problems are left to the interpolator.
#[derive(Debug, Clone)]
pub struct StreamWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for StreamWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

impl StreamWindow {
    /// Create an empty window. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add `sample` at the tail, evicting the head if the window is full.
    /// Returns the evicted sample, if any.
    pub fn append(&mut self, sample: Sample) -> Option<Sample> {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front()
        } else {
            None
        }
    }

    pub fn extend<I: IntoIterator<Item = Sample>>(&mut self, samples: I) {
        for s in samples {
            self.append(s);
        }
    }

    /// Read-only view in arrival order, oldest first.
    pub fn snapshot(&self) -> &VecDeque<Sample> {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// Samples as plot points, for the raw polyline.
    pub fn points(&self) -> Vec<PlotPoint> {
        self.samples.iter().map(Sample::to_point).collect()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
