//! The render loop: drain, snapshot, smooth, hand over.

use std::sync::Arc;
use std::thread::JoinHandle;

use crate::data::channel::Channel;
use crate::data::spline::{interpolate, DEFAULT_OUTPUT_POINTS};
use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::render::{RenderFrame, RenderSink};
use crate::ticker::{StopSignal, Ticker};

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub drained: usize,
    pub smoothed: usize,
    pub interpolation_errors: usize,
    pub rendered: bool,
}

/// Totals for a finished [`RenderOrchestrator::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub discarded: usize,
    pub diagnostics: DiagnosticsSnapshot,
}

/// Owns every channel on the render side and drives them once per tick.
pub struct RenderOrchestrator {
    channels: Vec<Channel>,
    output_points: usize,
    diagnostics: Arc<Diagnostics>,
    stop: StopSignal,
    ticks: u64,
}

impl RenderOrchestrator {
    pub fn new(channels: Vec<Channel>, diagnostics: Arc<Diagnostics>, stop: StopSignal) -> Self {
        Self {
            channels,
            output_points: DEFAULT_OUTPUT_POINTS,
            diagnostics,
            stop,
            ticks: 0,
        }
    }

    pub fn with_output_points(mut self, output_points: usize) -> Self {
        self.output_points = output_points;
        self
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn output_points(&self) -> usize {
        self.output_points
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Run one tick. Every channel is drained and smoothed before the
    /// renderer is called, so a failing renderer never holds samples back.
    pub fn tick<R: RenderSink + ?Sized>(&mut self, renderer: &mut R) -> TickReport {
        let mut report = TickReport::default();
        let mut frames = Vec::with_capacity(self.channels.len());

        for ch in self.channels.iter_mut() {
            report.drained += ch.drain();

            let window = ch.window();
            let raw = window.points();
            let fitted = interpolate(window.iter(), self.output_points);
            let smoothed = match fitted {
                Ok(curve) => {
                    ch.smoothing_failed = false;
                    if curve.is_empty() {
                        None
                    } else {
                        report.smoothed += 1;
                        Some(curve)
                    }
                }
                Err(e) => {
                    report.interpolation_errors += 1;
                    self.diagnostics.record_interpolation_error();
                    // An offending sample stays in the window for many ticks; warn
                    // when a channel enters the failing state, debug while it stays.
                    if ch.smoothing_failed {
                        tracing::debug!(channel = %ch.id, "still skipping smoothing: {e}");
                    } else {
                        tracing::warn!(channel = %ch.id, "skipping smoothing: {e}");
                    }
                    ch.smoothing_failed = true;
                    None
                }
            };

            frames.push(RenderFrame {
                channel: ch.id.clone(),
                label: ch.label.clone(),
                raw,
                smoothed,
            });
        }

        self.ticks += 1;
        self.diagnostics.record_tick(report.drained);

        match renderer.render(&frames) {
            Ok(()) => report.rendered = true,
            Err(e) => {
                self.diagnostics.record_skipped_frame();
                tracing::debug!("render frame skipped: {e}");
            }
        }
        report
    }

    /// Tick until `ticker` is exhausted or the stop signal is raised, then
    /// shut down. Shutdown raises the stop signal so producers stop feeding
    /// the queues, and discards anything still pending.
    pub fn run<T, R>(&mut self, ticker: &mut T, renderer: &mut R) -> RunSummary
    where
        T: Ticker + ?Sized,
        R: RenderSink + ?Sized,
    {
        while !self.stop.is_stopped() && ticker.next_tick(&self.stop) {
            self.tick(renderer);
        }
        self.shutdown()
    }

    /// Move the loop onto its own thread. Draining then keeps pace with the
    /// ticker no matter how often, or whether, anything reads the frames.
    pub fn spawn<T, R>(mut self, mut ticker: T, mut renderer: R) -> std::io::Result<JoinHandle<RunSummary>>
    where
        T: Ticker + Send + 'static,
        R: RenderSink + Send + 'static,
    {
        std::thread::Builder::new()
            .name("render loop".into())
            .spawn(move || self.run(&mut ticker, &mut renderer))
    }

    /// Raise the stop signal and discard pending samples.
    pub fn shutdown(&mut self) -> RunSummary {
        self.stop.stop();
        let ticks = self.ticks;
        let discarded: usize = self.channels.iter().map(Channel::discard_pending).sum();
        let diagnostics = self.diagnostics.snapshot();
        tracing::info!(ticks, discarded, "render loop stopped: {diagnostics}");
        RunSummary {
            ticks,
            discarded,
            diagnostics,
        }
    }
}
