//! Error types for every layer of the forecast path.
//!
//! Each component returns its own error enum; [`ForecastError`] unifies them so the
//! endpoint can map any terminal failure onto the wire format in one place.

use thiserror::Error;

/// Why an inbound payload was rejected. Messages are part of the public wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Payload or `time_series` has the wrong JSON shape.
    #[error("{0}")]
    InvalidShape(String),
    /// Fewer history points than the model needs.
    #[error("Need at least {min} historical data points")]
    InsufficientHistory { min: usize, got: usize },
    /// Horizon outside the family's closed range.
    #[error("Horizon must be between {min} and {max}")]
    HorizonOutOfRange { min: usize, max: usize },
    /// `model` is not one of the enumerated size classes.
    #[error("Model must be tiny, small, base, or large")]
    UnknownModelVariant(String),
}

/// Model failed to initialize. Never cached; the next request retries the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("failed to load {key}: {message}")]
    Backend { key: String, message: String },
    #[error("{0}")]
    Unsupported(String),
    #[error("model load task failed: {0}")]
    Join(String),
}

/// Runtime failure while sampling or reducing a forecast.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("{0}")]
    Model(String),
    #[error("unexpected sample shape: expected horizon {expected}, got {got}")]
    Shape { expected: usize, got: usize },
    #[error("model returned no sample trajectories")]
    NoSamples,
    #[error("model returned non-finite values")]
    NonFinite,
    #[error("inference task failed: {0}")]
    Join(String),
}

/// Any failure on the forecast path.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("forecast timed out after {0}s")]
    Timeout(u64),
}
