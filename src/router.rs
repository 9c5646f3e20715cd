//! Channel router: decodes inbound messages and enqueues them on the queue of
//! the channel they are addressed to.
//!
//! The router is what the transport side holds. It is cheap to clone and can
//! be called from any number of ingestion threads while the render loop
//! drains the same queues.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use crate::diagnostics::Diagnostics;
use crate::error::DecodeError;
use crate::sink::{ChannelId, PendingQueue, Sample};
use crate::ticker::StopSignal;

/// Naive formats tried in order. `%.f` also accepts a missing fraction.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Deserialize)]
struct WirePayload {
    timestamp: String,
    value: f64,
}

/// Decode a JSON payload `{"timestamp": "...", "value": <number>}`.
pub fn decode_payload(payload: &[u8]) -> Result<Sample, DecodeError> {
    let wire: WirePayload = serde_json::from_slice(payload)?;
    let timestamp = parse_timestamp(&wire.timestamp)?;
    Ok(Sample::new(timestamp, wire.value))
}

/// Parse the timestamp forms accepted on the wire. Offsets are normalised to UTC.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DecodeError> {
    let trimmed = raw.trim();
    for fmt in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts);
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.naive_utc())
        .map_err(|_| DecodeError::Timestamp {
            raw: raw.to_string(),
        })
}

/// Routes messages to per-channel pending queues.
#[derive(Clone)]
pub struct ChannelRouter {
    routes: Arc<HashMap<ChannelId, PendingQueue>>,
    diagnostics: Arc<Diagnostics>,
    stop: StopSignal,
}

impl ChannelRouter {
    pub(crate) fn new(
        routes: HashMap<ChannelId, PendingQueue>,
        diagnostics: Arc<Diagnostics>,
        stop: StopSignal,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            diagnostics,
            stop,
        }
    }

    /// Decode `payload` and enqueue it on `channel`.
    ///
    /// Messages for channels that were not configured, and messages arriving
    /// after shutdown began, are dropped and counted; both return `Ok(())`.
    /// A malformed payload is dropped and returned as a [`DecodeError`].
    pub fn route(&self, channel: &str, payload: &[u8]) -> Result<(), DecodeError> {
        let Some(queue) = self.accepting_queue(channel) else {
            return Ok(());
        };
        match decode_payload(payload) {
            Ok(sample) => {
                queue.push(sample);
                self.diagnostics.record_routed();
                tracing::debug!(channel, value = sample.value, "routed sample");
                Ok(())
            }
            Err(e) => {
                self.diagnostics.record_decode_error();
                tracing::warn!(channel, "dropping malformed payload: {e}");
                Err(e)
            }
        }
    }

    /// Enqueue an already decoded sample, with the same drop policy as [`route`](Self::route).
    pub fn route_sample(&self, channel: &str, sample: Sample) {
        if let Some(queue) = self.accepting_queue(channel) {
            queue.push(sample);
            self.diagnostics.record_routed();
            tracing::debug!(channel, value = sample.value, "routed sample");
        }
    }

    pub fn knows(&self, channel: &str) -> bool {
        self.routes.contains_key(channel)
    }

    pub fn pending(&self, channel: &str) -> Option<usize> {
        self.routes.get(channel).map(PendingQueue::len)
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    fn accepting_queue(&self, channel: &str) -> Option<&PendingQueue> {
        if self.stop.is_stopped() {
            self.diagnostics.record_dropped_after_stop();
            tracing::trace!(channel, "dropping message after shutdown");
            return None;
        }
        let queue = self.routes.get(channel);
        if queue.is_none() {
            self.diagnostics.record_unknown_channel();
            tracing::trace!(channel, "dropping message for unconfigured channel");
        }
        queue
    }
}
