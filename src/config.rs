//! Configuration for channels, tick cadence, smoothing and the synthetic
//! publisher.
//!
//! Stored as YAML. A missing file means "use defaults"; a malformed or
//! inconsistent one is a [`ConfigError`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::spline::DEFAULT_OUTPUT_POINTS;
use crate::data::window::DEFAULT_WINDOW_CAPACITY;
use crate::error::ConfigError;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// One logical stream the pipeline expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel id, e.g. the topic the transport delivers it on.
    pub name: String,
    /// Optional display label; the name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Window capacity in samples.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl ChannelConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

fn default_capacity() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

/// A single synthetic producer: publish to `channel` every `interval_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorStream {
    pub channel: String,
    pub interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub enabled: bool,
    pub min_value: f64,
    pub max_value: f64,
    pub streams: Vec<GeneratorStream>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_value: 10.0,
            max_value: 100.0,
            streams: vec![
                GeneratorStream {
                    channel: "time_series/data".to_string(),
                    interval_ms: 1000,
                },
                GeneratorStream {
                    channel: "time_series/data_stream_2".to_string(),
                    interval_ms: 2000,
                },
            ],
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamPlotConfig {
    /// Native window title.
    pub title: String,
    /// Minimum period between render ticks.
    pub tick_interval_ms: u64,
    /// Number of points the smoothed curve is sampled at.
    pub output_points: usize,
    /// Channels in render order.
    pub channels: Vec<ChannelConfig>,
    pub generator: GeneratorConfig,
}

impl Default for StreamPlotConfig {
    fn default() -> Self {
        Self {
            title: "Live Time-Series Data".to_string(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            output_points: DEFAULT_OUTPUT_POINTS,
            channels: vec![
                ChannelConfig::new("time_series/data"),
                ChannelConfig::new("time_series/data_stream_2"),
            ],
            generator: GeneratorConfig::default(),
        }
    }
}

impl StreamPlotConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                "Config file not found at '{}'; using defaults.",
                path.display()
            );
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_yaml(&raw)?;
        tracing::info!(
            channels = cfg.channels.len(),
            "loaded configuration from '{}'",
            path.display()
        );
        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let s = self.to_yaml()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, s).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.channels.is_empty() {
            return invalid("at least one channel must be configured".into());
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick_interval_ms must be positive".into());
        }
        if self.output_points < 2 {
            return invalid(format!(
                "output_points must be at least 2, got {}",
                self.output_points
            ));
        }

        let mut seen = HashSet::new();
        for ch in &self.channels {
            if ch.name.trim().is_empty() {
                return invalid("channel names must not be empty".into());
            }
            if ch.capacity == 0 {
                return invalid(format!("channel '{}' has zero capacity", ch.name));
            }
            if !seen.insert(ch.name.as_str()) {
                return invalid(format!("channel '{}' is configured twice", ch.name));
            }
        }

        let g = &self.generator;
        if g.enabled {
            if !g.min_value.is_finite() || !g.max_value.is_finite() {
                return invalid(format!(
                    "generator range must be finite ({} .. {})",
                    g.min_value, g.max_value
                ));
            }
            if !(g.min_value < g.max_value) {
                return invalid(format!(
                    "generator range is empty ({} .. {})",
                    g.min_value, g.max_value
                ));
            }
            // The sampler needs the width itself to be representable.
            if !(g.max_value - g.min_value).is_finite() {
                return invalid(format!(
                    "generator range is too wide ({} .. {})",
                    g.min_value, g.max_value
                ));
            }
            for s in &g.streams {
                if !seen.contains(s.channel.as_str()) {
                    return invalid(format!(
                        "generator stream targets unknown channel '{}'",
                        s.channel
                    ));
                }
                if s.interval_ms == 0 {
                    return invalid(format!(
                        "generator stream '{}' has zero interval",
                        s.channel
                    ));
                }
            }
        }
        Ok(())
    }
}
