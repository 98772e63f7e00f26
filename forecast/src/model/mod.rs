//! Pretrained model abstraction: a sampling interface and a loader.
//!
//! The engine treats a model as a black box: given history and a horizon it returns a
//! batch of sample trajectories. Backends:
//!
//! - [`BootstrapLoader`]: built-in bootstrap random-walk sampler; always available.
//! - [`OnnxLoader`] (feature `onnx`): exported pipeline run through ONNX Runtime.
//! - [`MockLoader`] / [`MockModel`]: fixed trajectories with load counting, for tests.

mod bootstrap;
mod mock;
#[cfg(feature = "onnx")]
mod onnx;

pub use bootstrap::{BootstrapLoader, BootstrapModel, DEFAULT_NUM_SAMPLES};
pub use mock::{MockLoader, MockModel};
#[cfg(feature = "onnx")]
pub use onnx::{OnnxLoader, OnnxModel};

use std::sync::Arc;

use async_trait::async_trait;
use ndarray::Array2;

use crate::error::{InferenceError, LoadError};
use crate::variant::{Device, ModelKey};

/// Sampled trajectories, shape `(num_samples, horizon)`.
pub type SampleBatch = Array2<f32>;

/// A loaded model ready to sample. Implementations must be safe to share across requests.
pub trait ForecastModel: Send + Sync {
    /// Draws sample trajectories over `horizon` future steps after `context`.
    ///
    /// Blocking; the engine calls it from a blocking worker thread.
    fn sample(&self, context: &[f32], horizon: usize) -> Result<SampleBatch, InferenceError>;

    /// Label reported as `model` in successful results.
    fn name(&self) -> &str;
}

/// Constructs models for cache keys. Called only on cache misses.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Loads the model identified by `key` onto `device`.
    async fn load(&self, key: &ModelKey, device: Device)
        -> Result<Arc<dyn ForecastModel>, LoadError>;
}
