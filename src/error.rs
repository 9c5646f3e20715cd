//! Error types shared across the ingestion, smoothing and render stages.
//!
//! None of these are fatal to a running pipeline: decode and interpolation
//! failures are counted and logged, render failures skip one frame. Only a
//! [`ConfigError`] at startup aborts the program.

use std::path::PathBuf;

use thiserror::Error;

/// An inbound payload could not be turned into a [`Sample`](crate::sink::Sample).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not a valid sample object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognised timestamp '{raw}'")]
    Timestamp { raw: String },
}

/// The window contents cannot be fitted with a spline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    /// x must be strictly increasing; `index` is the first offending sample.
    #[error("timestamps not strictly increasing at index {index} ({previous} -> {current})")]
    NonMonotonic {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("non-finite coordinate at index {index}")]
    NonFinite { index: usize },

    #[error("x and y have different lengths ({xs} vs {ys})")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("at least two knots are required, got {0}")]
    TooFewKnots(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A renderer could not present a tick's frames.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render surface unavailable: {0}")]
    Unavailable(String),

    #[error("render surface busy, frame skipped")]
    Busy,
}
