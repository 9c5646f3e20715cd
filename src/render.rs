//! The hand-off between the render loop and whatever draws the result.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::RenderError;
use crate::sink::{ChannelId, PlotPoint};

/// Everything a renderer needs to draw one channel for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub channel: ChannelId,
    pub label: String,
    /// Window contents in arrival order.
    pub raw: Vec<PlotPoint>,
    /// Smoothed curve, absent when the window is too short or could not be fitted.
    pub smoothed: Option<Vec<PlotPoint>>,
}

impl RenderFrame {
    pub fn latest(&self) -> Option<&PlotPoint> {
        self.raw.last()
    }
}

/// Rendering collaborator. Receives all channels of a tick in configured order.
///
/// Returning an error skips the frame; the pipeline keeps ticking.
pub trait RenderSink {
    fn render(&mut self, frames: &[RenderFrame]) -> Result<(), RenderError>;
}

/// Keeps only the most recent tick. Clones share the same slot, so the loop
/// can write from its thread while the GUI reads on its own schedule.
#[derive(Debug, Clone, Default)]
pub struct LatestFrames {
    frames: Arc<Mutex<Vec<RenderFrame>>>,
}

impl LatestFrames {
    pub fn snapshot(&self) -> Vec<RenderFrame> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RenderFrame>> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderSink for LatestFrames {
    fn render(&mut self, frames: &[RenderFrame]) -> Result<(), RenderError> {
        let mut slot = self.lock();
        slot.clear();
        slot.extend_from_slice(frames);
        Ok(())
    }
}

/// Headless renderer that reports frames through `tracing`.
#[derive(Debug)]
pub struct LogRenderer {
    summary_every: Duration,
    last_summary: Option<Instant>,
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl LogRenderer {
    pub fn new(summary_every: Duration) -> Self {
        Self {
            summary_every,
            last_summary: None,
        }
    }
}

impl RenderSink for LogRenderer {
    fn render(&mut self, frames: &[RenderFrame]) -> Result<(), RenderError> {
        for f in frames {
            tracing::debug!(
                channel = %f.channel,
                raw = f.raw.len(),
                smoothed = f.smoothed.as_ref().map_or(0, Vec::len),
                latest = ?f.latest().map(|p| p.y),
                "frame"
            );
        }
        let due = self
            .last_summary
            .map_or(true, |t| t.elapsed() >= self.summary_every);
        if due {
            self.last_summary = Some(Instant::now());
            for f in frames {
                match f.latest() {
                    Some(p) => tracing::info!(
                        "{}: {} points, latest {:.3} at {}",
                        f.label,
                        f.raw.len(),
                        p.y,
                        p.timestamp()
                            .map(|t| t.format("%H:%M:%S").to_string())
                            .unwrap_or_default()
                    ),
                    None => tracing::info!("{}: no data yet", f.label),
                }
            }
        }
        Ok(())
    }
}
