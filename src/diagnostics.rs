//! Counters that make recoverable failures observable without stopping the
//! pipeline.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters shared by the router (ingestion side) and the
/// orchestrator (render side).
#[derive(Debug, Default)]
pub struct Diagnostics {
    routed: AtomicU64,
    decode_errors: AtomicU64,
    unknown_channel: AtomicU64,
    dropped_after_stop: AtomicU64,
    ticks: AtomicU64,
    drained: AtomicU64,
    interpolation_errors: AtomicU64,
    skipped_frames: AtomicU64,
}

/// Point-in-time copy of [`Diagnostics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub routed: u64,
    pub decode_errors: u64,
    pub unknown_channel: u64,
    pub dropped_after_stop: u64,
    pub ticks: u64,
    pub drained: u64,
    pub interpolation_errors: u64,
    pub skipped_frames: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_routed(&self) {
        self.routed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unknown_channel(&self) {
        self.unknown_channel.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped_after_stop(&self) {
        self.dropped_after_stop.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tick(&self, drained: usize) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.drained.fetch_add(drained as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_interpolation_error(&self) {
        self.interpolation_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped_frame(&self) {
        self.skipped_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            routed: self.routed.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            unknown_channel: self.unknown_channel.load(Ordering::Relaxed),
            dropped_after_stop: self.dropped_after_stop.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            interpolation_errors: self.interpolation_errors.load(Ordering::Relaxed),
            skipped_frames: self.skipped_frames.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Display for DiagnosticsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ticks={} routed={} drained={} decode_errors={} unknown_channel={} \
             dropped_after_stop={} interpolation_errors={} skipped_frames={}",
            self.ticks,
            self.routed,
            self.drained,
            self.decode_errors,
            self.unknown_channel,
            self.dropped_after_stop,
            self.interpolation_errors,
            self.skipped_frames,
        )
    }
}
