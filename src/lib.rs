//! StreamPlot crate root: re-exports and module wiring.
//!
//! Timestamped samples arrive on named channels from an ingestion thread,
//! are buffered in a bounded window per channel, and are smoothed with a
//! natural cubic spline for live display.
//!
//! - `sink`: sample types and the pending queue shared with producers
//! - `router`: decodes inbound payloads and routes them by channel id
//! - `data`: per-channel window, drain step and spline interpolation
//! - `orchestrator`: the tick loop tying drain, smoothing and rendering together
//! - `render`: the renderer hand-off and a headless log renderer
//! - `ticker`: tick cadence and the cooperative stop signal
//! - `config`: YAML configuration
//! - `generator`: synthetic producer standing in for a broker
//! - `app`: egui/eframe window (feature `gui`)

pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod render;
pub mod router;
pub mod sink;
pub mod ticker;

#[cfg(feature = "gui")]
pub mod app;

pub use config::{ChannelConfig, GeneratorConfig, StreamPlotConfig};
pub use data::channel::{channel_set, Channel};
pub use data::spline::{interpolate, NaturalCubicSpline, MIN_INTERPOLATION_POINTS};
pub use data::window::StreamWindow;
pub use diagnostics::{Diagnostics, DiagnosticsSnapshot};
pub use error::{ConfigError, DecodeError, InterpolationError, RenderError};
pub use orchestrator::{RenderOrchestrator, RunSummary, TickReport};
pub use render::{LatestFrames, LogRenderer, RenderFrame, RenderSink};
pub use router::ChannelRouter;
pub use sink::{ChannelId, PendingQueue, PlotPoint, Sample};
pub use ticker::{FixedTicks, IntervalTicker, StopSignal, Ticker};

#[cfg(feature = "gui")]
pub use app::{run_streamplot, StreamPlotApp};
