//! Render-side channel state and the per-tick drain.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::StreamPlotConfig;
use crate::data::window::StreamWindow;
use crate::diagnostics::Diagnostics;
use crate::router::ChannelRouter;
use crate::sink::{ChannelId, PendingQueue};
use crate::ticker::StopSignal;

/// One logical stream as seen by the render loop: the reading end of its
/// pending queue plus the window it is drained into.
pub struct Channel {
    pub id: ChannelId,
    /// Display label; defaults to the id.
    pub label: String,
    queue: PendingQueue,
    window: StreamWindow,
    pub(crate) smoothing_failed: bool,
}

impl Channel {
    pub fn new(id: impl Into<ChannelId>, capacity: usize) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            queue: PendingQueue::new(),
            window: StreamWindow::new(capacity),
            smoothing_failed: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Handle producers push into.
    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn window(&self) -> &StreamWindow {
        &self.window
    }

    /// Move everything pending at call time into the window, in arrival
    /// order. Returns the number of samples moved.
    pub fn drain(&mut self) -> usize {
        let batch = self.queue.take_all();
        let n = batch.len();
        self.window.extend(batch);
        n
    }

    /// Drop queued samples that were never drained.
    pub fn discard_pending(&self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        n
    }
}

/// Build the channels described by `config` together with a router that
/// shares only their pending queues. The channels stay with the render loop,
/// the router goes to the ingestion side.
pub fn channel_set(
    config: &StreamPlotConfig,
    diagnostics: Arc<Diagnostics>,
    stop: StopSignal,
) -> (ChannelRouter, Vec<Channel>) {
    let channels: Vec<Channel> = config
        .channels
        .iter()
        .map(|c| {
            let ch = Channel::new(c.name.clone(), c.capacity);
            match &c.label {
                Some(label) => ch.with_label(label.clone()),
                None => ch,
            }
        })
        .collect();
    let routes: HashMap<ChannelId, PendingQueue> = channels
        .iter()
        .map(|c| (c.id.clone(), c.queue.clone()))
        .collect();
    (ChannelRouter::new(routes, diagnostics, stop), channels)
}
