//! Synthetic publisher: random readings on a fixed interval per stream.
//!
//! Stands in for a real transport. Each stream runs on its own thread and
//! publishes JSON payloads through the [`ChannelRouter`], exactly as messages
//! from a broker would arrive.

use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Local;
use rand::Rng;

use crate::config::{GeneratorConfig, GeneratorStream};
use crate::router::ChannelRouter;

/// Timestamp format used on the wire (second precision, local time).
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build one payload with the current local time and `value`.
pub fn payload(value: f64) -> Vec<u8> {
    let msg = serde_json::json!({
        "timestamp": Local::now().format(WIRE_TIMESTAMP_FORMAT).to_string(),
        "value": value,
    });
    msg.to_string().into_bytes()
}

/// Handles of the running producer threads.
pub struct SyntheticPublisher {
    handles: Vec<JoinHandle<()>>,
}

impl SyntheticPublisher {
    /// Start one producer per configured stream. Producers exit when the
    /// router's stop signal is raised.
    pub fn spawn(config: &GeneratorConfig, router: &ChannelRouter) -> std::io::Result<Self> {
        let (lo, hi) = (config.min_value, config.max_value);
        if !(lo < hi && (hi - lo).is_finite()) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("cannot sample values from {lo} .. {hi}"),
            ));
        }
        let mut handles = Vec::with_capacity(config.streams.len());
        for stream in &config.streams {
            let router = router.clone();
            let stream = stream.clone();
            let handle = std::thread::Builder::new()
                .name(format!("publish {}", stream.channel))
                .spawn(move || publish_loop(router, stream, (lo, hi)))?;
            handles.push(handle);
        }
        Ok(Self { handles })
    }

    /// Wait for every producer to finish. Call after raising the stop signal.
    pub fn join(self) {
        for h in self.handles {
            if h.join().is_err() {
                tracing::error!("publisher thread panicked");
            }
        }
    }
}

fn publish_loop(router: ChannelRouter, stream: GeneratorStream, (lo, hi): (f64, f64)) {
    let interval = Duration::from_millis(stream.interval_ms);
    let mut rng = rand::thread_rng();
    tracing::info!(channel = %stream.channel, ?interval, "publisher started");

    while !router.stop_signal().is_stopped() {
        let value = rng.gen_range(lo..hi);
        // Rejections are counted and logged by the router.
        let _ = router.route(&stream.channel, &payload(value));
        if router.stop_signal().wait_timeout(interval) {
            break;
        }
    }
    tracing::info!(channel = %stream.channel, "publisher stopped");
}
